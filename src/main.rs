//! netrules - merge and convert proxy rule lists.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use netrules::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    // stdout carries the produced document
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Merge {
            ruleset,
            sources,
            urls,
            output,
        } => netrules::commands::merge::run(ruleset, sources, urls, output, &cli.config).await,
        Commands::Convert {
            identifier,
            input,
            output,
        } => netrules::commands::convert::run(&identifier, input, output, &cli.config).await,
        Commands::Filter {
            source,
            prefixes,
            suffixes,
            keywords,
        } => {
            netrules::commands::filter::run(&source, &prefixes, &suffixes, &keywords, &cli.config)
                .await
        }
        Commands::Hosts { source } => netrules::commands::hosts::run(&source, &cli.config).await,
        Commands::Version => {
            println!("netrules {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
