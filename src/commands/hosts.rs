//! Hosts command implementation.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;

use crate::cli::InputArgs;
use crate::config::Config;
use crate::hosts::hosts_to_rules;

use super::{read_input, write_output};

/// Run the hosts command
pub async fn run(source: &InputArgs, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    let (origin, content) = read_input(&config, source).await?;
    write_output(None, &hosts_to_rules(&origin, &content, Utc::now())).await
}
