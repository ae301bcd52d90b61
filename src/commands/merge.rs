//! Merge command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::fetcher::{Fetcher, HttpTransport};
use crate::merger::Merger;
use crate::source::{parse_source_list, RuleSource};

use super::write_output;

/// Run the merge command
pub async fn run(
    ruleset: Option<String>,
    sources_file: Option<PathBuf>,
    urls: Vec<String>,
    output: Option<PathBuf>,
    config_path: &Path,
) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    let sources: Vec<RuleSource> = if let Some(name) = ruleset {
        config
            .ruleset(&name)
            .ok_or_else(|| anyhow::anyhow!("Unknown ruleset '{}' in {:?}", name, config_path))?
            .iter()
            .map(|url| RuleSource::from(url.as_str()))
            .collect()
    } else if let Some(path) = sources_file {
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read source list: {:?}", path))?;
        parse_source_list(&content)
    } else if !urls.is_empty() {
        urls.into_iter().map(RuleSource::from).collect()
    } else {
        anyhow::bail!("No sources given: pass URLs, --sources FILE or --ruleset NAME");
    };

    if sources.is_empty() {
        warn!("Source list is empty, the merged document will have no entries");
    }

    info!(
        "Merging {} rule documents ({} concurrent)...",
        sources.len(),
        config.concurrency
    );

    let fetcher = Fetcher::new(HttpTransport::new(&config)?, config.concurrency);
    let document = Merger::new(fetcher).merge(&sources).await;

    write_output(output.as_deref(), &document.to_string()).await
}
