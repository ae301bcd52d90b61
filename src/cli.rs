//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netrules")]
#[command(author, version, about = "Merge and convert proxy rule lists")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "netrules.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where a command reads its single input document from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// URL of the document to fetch
    #[arg(required_unless_present = "input", conflicts_with = "input")]
    pub url: Option<String>,

    /// Read the document from a local file instead of fetching it
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge several rule documents into one
    Merge {
        /// Use a named ruleset from the config file
        #[arg(long, conflicts_with_all = ["sources", "urls"])]
        ruleset: Option<String>,

        /// Read source URLs from a file (one per line, # and // comments)
        #[arg(long, conflicts_with = "urls")]
        sources: Option<PathBuf>,

        /// Source URLs, merged in the given order
        urls: Vec<String>,

        /// Write the merged document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert one rule document to another dialect
    Convert {
        /// Document URL with conversion parameters, e.g.
        /// https://host/list.yaml?src=clash&dst=quan&type=rule&subtype=domain&policy=PROXY
        identifier: String,

        /// Read the document body from a local file instead of fetching it
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the converted document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Drop rules whose domain matches a prefix, suffix or keyword
    Filter {
        #[command(flatten)]
        source: InputArgs,

        /// Comma-separated domain prefixes ("+." variants are added)
        #[arg(long, default_value = "")]
        prefixes: String,

        /// Comma-separated domain suffixes
        #[arg(long, default_value = "")]
        suffixes: String,

        /// Comma-separated keywords
        #[arg(long, default_value = "")]
        keywords: String,
    },

    /// Generate a domain rule document from a hosts file
    Hosts {
        #[command(flatten)]
        source: InputArgs,
    },

    /// Show version
    Version,
}
