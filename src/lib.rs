//! # netrules - proxy rule-list transport
//!
//! Fetches proxy routing rule lists (domains, CIDR blocks, ASNs) from many
//! remote documents and serves them as one merged document or rewritten in
//! another rule-list dialect.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        netrules                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: merge, convert, filter, hosts, version     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Concurrency, HTTP headers, named rulesets            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Merger                                                     │
//! │    ├── Fetcher (reqwest + rustls, bounded concurrency)      │
//! │    └── Extractor (payload section + provenance line)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Resource conversion                                        │
//! │    ├── Params (identifier query block)                      │
//! │    ├── Transcoder (clash -> quan / surge, ASN lists)        │
//! │    └── Generator (inline base64 content)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use netrules::config::Config;
//! use netrules::fetcher::{Fetcher, HttpTransport};
//! use netrules::merger::Merger;
//! use netrules::source::RuleSource;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("netrules.yaml")?;
//!
//!     let fetcher = Fetcher::new(HttpTransport::new(&config)?, config.concurrency);
//!     let sources = vec![
//!         RuleSource::from("https://example.com/telegram-cidr.yaml"),
//!         RuleSource::from("https://example.com/apple.yaml"),
//!     ];
//!
//!     let document = Merger::new(fetcher).merge(&sources).await;
//!     print!("{}", document);
//!
//!     Ok(())
//! }
//! ```
//!
//! Converting a single document:
//!
//! ```
//! use netrules::params::ConversionParams;
//! use netrules::resource::convert_resource;
//! use netrules::transcoder::Transcoder;
//!
//! let params = ConversionParams::parse(
//!     "https://example.com/tg.yaml?src=clash&dst=quan&type=rule&subtype=ipcidr&policy=PROXY!no-resolve",
//! )
//! .unwrap();
//! let output = convert_resource(&Transcoder::default(), &params, "payload:\n- \"91.108.56.0/22\"").unwrap();
//! assert_eq!(output, "IP-CIDR,91.108.56.0/22,PROXY,no-resolve");
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Library error type
//! - [`extractor`] - Payload section extraction for merging
//! - [`fetcher`] - Transport trait, HTTP client and bounded-concurrency fetcher
//! - [`filter`] - Prefix/suffix/keyword rule filter
//! - [`generator`] - Inline base64 rule content
//! - [`hosts`] - Hosts file to domain rule document
//! - [`merger`] - Multi-source merged documents
//! - [`params`] - Conversion parameters from source identifiers
//! - [`resource`] - Single-document conversion by document type
//! - [`source`] - Rule source identifiers and source lists
//! - [`transcoder`] - Rule dialect transcoding

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod filter;
pub mod generator;
pub mod hosts;
pub mod merger;
pub mod params;
pub mod resource;
pub mod source;
pub mod transcoder;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::RulesError;
pub use merger::{MergedDocument, Merger};
pub use params::ConversionParams;
pub use source::RuleSource;
