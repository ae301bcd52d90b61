//! Rule source identifiers and source-list parsing.

use std::fmt;

/// An opaque identifier (URI) of a remote rule document.
///
/// Equality is by string value. Ordering inside a merge is the position in
/// the caller-supplied list, never anything derived from the value itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSource(String);

impl RuleSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleSource {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RuleSource {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Parse a newline-delimited source list.
///
/// Lines are trimmed; empty lines and lines starting with `#` or `//` are
/// dropped. Remaining lines keep their relative order.
pub fn parse_source_list(content: &str) -> Vec<RuleSource> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("//") && !line.starts_with('#'))
        .map(RuleSource::from)
        .collect()
}
