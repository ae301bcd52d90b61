//! CLI command implementations.

pub mod convert;
pub mod filter;
pub mod hosts;
pub mod merge;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::cli::InputArgs;
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpTransport};
use crate::source::RuleSource;

/// Fetch one document over HTTP, failing on any transport error.
pub(crate) async fn fetch_document(config: &Config, source: &RuleSource) -> Result<String> {
    let fetcher = Fetcher::new(HttpTransport::new(config)?, 1);
    let body = fetcher.fetch(source).await.into_body()?;
    Ok(body)
}

/// Resolve a command's single input document, from a file or a URL.
pub(crate) async fn read_input(config: &Config, args: &InputArgs) -> Result<(RuleSource, String)> {
    if let Some(ref path) = args.input {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input file: {:?}", path))?;
        return Ok((RuleSource::new(path.display().to_string()), content));
    }

    let url = args
        .url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Either a URL or --input is required"))?;
    let source = RuleSource::from(url);
    let content = fetch_document(config, &source).await?;
    Ok((source, content))
}

/// Write a produced document to `output`, or to stdout.
pub(crate) async fn write_output(output: Option<&Path>, document: &str) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, document)
                .await
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            info!("[OK] Wrote {} bytes to {:?}", document.len(), path);
        }
        None => {
            use tokio::io::AsyncWriteExt;

            let mut stdout = tokio::io::stdout();
            stdout.write_all(document.as_bytes()).await?;
            if !document.ends_with('\n') {
                stdout.write_all(b"\n").await?;
            }
            stdout.flush().await?;
        }
    }
    Ok(())
}
