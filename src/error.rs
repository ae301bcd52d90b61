//! Error types for netrules.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Malformed rule line: {0}")]
    MalformedLine(String),

    #[error("No IP-ASN lines found within the content")]
    NoMatches,

    #[error("No valid lines found within the content parameter")]
    EmptyContent,

    #[error("Invalid base64 content: {0}")]
    InvalidBase64(String),

    #[error("Unsupported conversion: {0}")]
    Unsupported(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
