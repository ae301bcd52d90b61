//! Conversion parameters decoded from a source identifier.
//!
//! A source identifier looks like
//! `https://host/path/rules.yaml?src=clash&dst=quan&type=rule&subtype=ipcidr&policy=PROXY!no-resolve`.
//! The compound separator (`!` by default) is replaced by `,` inside the
//! parameter block before it is split into pairs, so a single value such as
//! the policy can carry a comma-joined compound (`PROXY,no-resolve`).

use std::fmt;

use crate::error::RulesError;

/// Default substitution character for `,` inside parameter values.
pub const DEFAULT_COMPOUND_SEPARATOR: char = '!';

/// A rule-list text syntax used by a proxy-client ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialect {
    /// YAML-list based rule providers (`payload:` followed by `- "..."`).
    Clash,
    /// Comma-field based filter lists (`HOST,example.com,POLICY`).
    Quan,
    /// Domain-set lists (`example.com`, `.example.com`).
    Surge,
    /// Wildcard accepted by dialect-agnostic conversions.
    Any,
    #[default]
    Unset,
    Other(String),
}

impl From<&str> for Dialect {
    fn from(value: &str) -> Self {
        match value {
            "clash" => Dialect::Clash,
            "quan" => Dialect::Quan,
            "surge" => Dialect::Surge,
            "any" => Dialect::Any,
            "" => Dialect::Unset,
            other => Dialect::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Clash => f.write_str("clash"),
            Dialect::Quan => f.write_str("quan"),
            Dialect::Surge => f.write_str("surge"),
            Dialect::Any => f.write_str("any"),
            Dialect::Unset => f.write_str("<unset>"),
            Dialect::Other(s) => f.write_str(s),
        }
    }
}

/// Kind of document a request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocType {
    Rule,
    Generate,
    Server,
    Rewrite,
    #[default]
    Unset,
    Other(String),
}

impl From<&str> for DocType {
    fn from(value: &str) -> Self {
        match value {
            "rule" => DocType::Rule,
            "generate" => DocType::Generate,
            "server" => DocType::Server,
            "rewrite" => DocType::Rewrite,
            "" => DocType::Unset,
            other => DocType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocType::Rule => f.write_str("rule"),
            DocType::Generate => f.write_str("generate"),
            DocType::Server => f.write_str("server"),
            DocType::Rewrite => f.write_str("rewrite"),
            DocType::Unset => f.write_str("<unset>"),
            DocType::Other(s) => f.write_str(s),
        }
    }
}

/// Semantic kind of the rule entries in a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Subtype {
    Domain,
    IpCidr,
    IpAsn,
    Mixed,
    #[default]
    Unset,
    Other(String),
}

impl From<&str> for Subtype {
    fn from(value: &str) -> Self {
        match value {
            "domain" => Subtype::Domain,
            "ipcidr" => Subtype::IpCidr,
            "ipasn" => Subtype::IpAsn,
            "mixed" => Subtype::Mixed,
            "" => Subtype::Unset,
            other => Subtype::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subtype::Domain => f.write_str("domain"),
            Subtype::IpCidr => f.write_str("ipcidr"),
            Subtype::IpAsn => f.write_str("ipasn"),
            Subtype::Mixed => f.write_str("mixed"),
            Subtype::Unset => f.write_str("<unset>"),
            Subtype::Other(s) => f.write_str(s),
        }
    }
}

/// Parameters of one conversion request. Immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionParams {
    /// Identifier with the parameter block removed (the document to fetch).
    pub base: String,
    pub src: Dialect,
    pub dst: Dialect,
    pub doc_type: DocType,
    pub subtype: Subtype,
    /// Policy appended verbatim to every produced rule, e.g. `PROXY,no-resolve`.
    pub policy: String,
    /// Inline base64 rule body for `type=generate`.
    pub content: Option<String>,
}

impl ConversionParams {
    /// Parse an identifier using the default `!` compound separator.
    pub fn parse(identifier: &str) -> Result<Self, RulesError> {
        Self::parse_with_separator(identifier, DEFAULT_COMPOUND_SEPARATOR)
    }

    /// Parse an identifier, replacing `separator` by `,` in the parameter block.
    ///
    /// Fails when the identifier does not contain exactly one `?` or when a
    /// pair has no `=`. Pairs are cut at the first `=` only; unknown keys are
    /// ignored.
    pub fn parse_with_separator(identifier: &str, separator: char) -> Result<Self, RulesError> {
        let mut sections = identifier.split('?');
        let (base, query) = match (sections.next(), sections.next(), sections.next()) {
            (Some(base), Some(query), None) => (base, query),
            _ => {
                return Err(RulesError::InvalidParams(format!(
                    "expected exactly one '?' in {}",
                    identifier
                )))
            }
        };

        let query = query.replace(separator, ",");
        let mut params = ConversionParams {
            base: base.to_string(),
            ..Default::default()
        };

        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                RulesError::InvalidParams(format!("parameter '{}' has no '='", pair))
            })?;

            match key {
                "src" => params.src = Dialect::from(value),
                "dst" => params.dst = Dialect::from(value),
                "type" => params.doc_type = DocType::from(value),
                "subtype" => params.subtype = Subtype::from(value),
                "policy" => params.policy = value.to_string(),
                "content" => params.content = Some(value.to_string()),
                _ => continue,
            }
        }

        Ok(params)
    }

    /// Whether producing this document needs the remote body at `base`.
    pub fn needs_remote_content(&self) -> bool {
        !matches!(self.doc_type, DocType::Generate)
    }
}
