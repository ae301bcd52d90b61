//! Filter command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::cli::InputArgs;
use crate::config::Config;
use crate::filter::RuleFilter;

use super::{read_input, write_output};

/// Run the filter command
pub async fn run(
    source: &InputArgs,
    prefixes: &str,
    suffixes: &str,
    keywords: &str,
    config_path: &Path,
) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    let filter = RuleFilter::new(prefixes, suffixes, keywords);
    if filter.is_empty() {
        info!("No prefixes, suffixes or keywords given; document is passed through");
    }

    let (_, content) = read_input(&config, source).await?;
    write_output(None, &filter.apply(&content)).await
}
