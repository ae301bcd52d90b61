//! Convert command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::params::ConversionParams;
use crate::resource::{convert_resource, validate};
use crate::source::RuleSource;
use crate::transcoder::Transcoder;

use super::{fetch_document, write_output};

/// Run the convert command
pub async fn run(
    identifier: &str,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config_path: &Path,
) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    let params = ConversionParams::parse_with_separator(identifier, config.compound_separator)
        .with_context(|| format!("Invalid identifier: {}", identifier))?;
    validate(&params).with_context(|| format!("Cannot convert {}", identifier))?;

    let content = if !params.needs_remote_content() {
        String::new()
    } else if let Some(ref path) = input {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input file: {:?}", path))?
    } else {
        info!("Fetching {}...", params.base);
        fetch_document(&config, &RuleSource::from(params.base.as_str())).await?
    };

    let transcoder = Transcoder::new(config.on_malformed_line);
    let document = convert_resource(&transcoder, &params, &content)
        .with_context(|| format!("Conversion failed for {}", params.base))?;

    write_output(output.as_deref(), &document).await
}
