//! Rule dialect transcoder.
//!
//! Converts rule text from one dialect/subtype into another. Pure functions,
//! no I/O. Supported conversions:
//!
//! | subtype | src | dst | output |
//! |---------|-----|-----|--------|
//! | `ipasn` | any | any | `IP-ASN,<n>,<policy>` |
//! | `domain` | clash | quan | `HOST` / `HOST-SUFFIX` |
//! | `ipcidr` | clash | quan | `IP-CIDR` / `IP6-CIDR` |
//! | `domain` | clash | surge | domain-set (`host`, `.suffix`) |
//!
//! Clash list items are tokenized strictly: a line that does not split into
//! exactly three or four fields aborts the whole conversion unless the
//! caller opted into [`MalformedLinePolicy::Skip`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RulesError;
use crate::params::{ConversionParams, Dialect, Subtype};

static LIST_ITEM_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r#""|\+\."#).unwrap());

static IPV4_CIDR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}(/\d+)?$").unwrap());

static IP_ASN: Lazy<Regex> = Lazy::new(|| Regex::new(r"IP-ASN\s*,\s*(\d+)").unwrap());

/// How a malformed domain/ipcidr list item is handled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Fail the whole conversion, discarding converted lines
    #[default]
    Abort,
    /// Drop only the offending line
    Skip,
}

/// Parsed representation of one rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEntry {
    Domain { value: String, suffix: bool },
    IpCidr { value: String, is_ipv6: bool },
    Asn { number: u32 },
}

impl RuleEntry {
    /// Classify a CIDR (or bare address) as IPv4 or IPv6.
    pub fn cidr(value: &str) -> Self {
        RuleEntry::IpCidr {
            value: value.to_string(),
            is_ipv6: !IPV4_CIDR.is_match(value),
        }
    }

    /// Render as a comma-field rule (`HOST,example.com,DIRECT`).
    pub fn to_quan(&self, policy: &str) -> String {
        match self {
            RuleEntry::Domain {
                value,
                suffix: false,
            } => format!("HOST,{},{}", value, policy),
            RuleEntry::Domain {
                value,
                suffix: true,
            } => format!("HOST-SUFFIX,{},{}", value, policy),
            RuleEntry::IpCidr {
                value,
                is_ipv6: false,
            } => format!("IP-CIDR,{},{}", value, policy),
            RuleEntry::IpCidr {
                value,
                is_ipv6: true,
            } => format!("IP6-CIDR,{},{}", value, policy),
            RuleEntry::Asn { number } => format!("IP-ASN,{},{}", number, policy),
        }
    }

    /// Render as a domain-set line; only domain entries have one.
    pub fn to_domain_set(&self) -> Option<String> {
        match self {
            RuleEntry::Domain {
                value,
                suffix: false,
            } => Some(value.clone()),
            RuleEntry::Domain {
                value,
                suffix: true,
            } => Some(format!(".{}", value)),
            RuleEntry::IpCidr { .. } | RuleEntry::Asn { .. } => None,
        }
    }
}

/// A YAML list item split on `"` and on the `+.` wildcard marker.
///
/// `- "example.com"` splits into three fields (`- `, `example.com`, ``);
/// `- "+.example.com"` into four (`- `, ``, `example.com`, ``).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListToken<'a> {
    /// Three fields: the quoted value.
    Quoted(&'a str),
    /// Four fields: the text before the marker and the text after it.
    Wildcard { head: &'a str, value: &'a str },
}

/// Tokenize one line of a clash rule provider.
///
/// Returns `Ok(None)` for lines that are not list items (comments, blank
/// lines, the `payload:` key) and `MalformedLine` for list items that do not
/// split into three or four fields.
pub fn tokenize_list_item(line: &str) -> Result<Option<ListToken<'_>>, RulesError> {
    let line = line.trim();
    if !line.starts_with('-') {
        return Ok(None);
    }

    let fields: Vec<&str> = LIST_ITEM_SPLIT.split(line).collect();
    match fields.as_slice() {
        [_, value, _] => Ok(Some(ListToken::Quoted(*value))),
        [_, head, value, _] => Ok(Some(ListToken::Wildcard {
            head: *head,
            value: *value,
        })),
        _ => Err(RulesError::MalformedLine(line.to_string())),
    }
}

/// Rule kind carried by a clash list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Domain,
    IpCidr,
}

impl ListKind {
    fn entry(self, token: ListToken<'_>) -> RuleEntry {
        match (self, token) {
            (ListKind::Domain, ListToken::Quoted(value)) => RuleEntry::Domain {
                value: value.to_string(),
                suffix: false,
            },
            (ListKind::Domain, ListToken::Wildcard { value, .. }) => RuleEntry::Domain {
                value: value.to_string(),
                suffix: true,
            },
            (ListKind::IpCidr, ListToken::Quoted(value))
            | (ListKind::IpCidr, ListToken::Wildcard { head: value, .. }) => RuleEntry::cidr(value),
        }
    }
}

/// The closed set of supported `(subtype, src, dst)` triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `subtype=ipasn`, any dialects
    AsnList,
    /// clash provider to comma-field rules
    ClashToQuan(ListKind),
    /// clash domain provider to a domain-set
    ClashToSurgeDomainSet,
}

impl Conversion {
    pub fn resolve(params: &ConversionParams) -> Result<Self, RulesError> {
        match (&params.subtype, &params.src, &params.dst) {
            (Subtype::IpAsn, _, _) => Ok(Conversion::AsnList),
            (Subtype::Domain, Dialect::Clash, Dialect::Quan) => {
                Ok(Conversion::ClashToQuan(ListKind::Domain))
            }
            (Subtype::IpCidr, Dialect::Clash, Dialect::Quan) => {
                Ok(Conversion::ClashToQuan(ListKind::IpCidr))
            }
            (Subtype::Domain, Dialect::Clash, Dialect::Surge) => {
                Ok(Conversion::ClashToSurgeDomainSet)
            }
            (subtype, src, dst) => Err(RulesError::Unsupported(format!(
                "from {} to {} with subtype={}",
                src, dst, subtype
            ))),
        }
    }
}

/// Stateless converter carrying the malformed-line policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transcoder {
    on_malformed: MalformedLinePolicy,
}

impl Transcoder {
    pub fn new(on_malformed: MalformedLinePolicy) -> Self {
        Self { on_malformed }
    }

    /// Convert a full rule body. No partial output on failure.
    pub fn convert(
        &self,
        params: &ConversionParams,
        content: &str,
    ) -> Result<Vec<String>, RulesError> {
        match Conversion::resolve(params)? {
            Conversion::AsnList => Ok(parse_asn_entries(content)?
                .iter()
                .map(|entry| entry.to_quan(&params.policy))
                .collect()),
            Conversion::ClashToQuan(kind) => Ok(self
                .parse_list_entries(kind, content)?
                .iter()
                .map(|entry| entry.to_quan(&params.policy))
                .collect()),
            Conversion::ClashToSurgeDomainSet => Ok(self
                .parse_list_entries(ListKind::Domain, content)?
                .iter()
                .filter_map(RuleEntry::to_domain_set)
                .collect()),
        }
    }

    /// Parse every list item of a clash provider body.
    pub fn parse_list_entries(
        &self,
        kind: ListKind,
        content: &str,
    ) -> Result<Vec<RuleEntry>, RulesError> {
        let mut entries = Vec::new();

        for line in content.lines() {
            match tokenize_list_item(line) {
                Ok(Some(token)) => entries.push(kind.entry(token)),
                Ok(None) => continue,
                Err(e) => match self.on_malformed {
                    MalformedLinePolicy::Abort => {
                        warn!(line = line.trim(), "invalid rule line, aborting conversion");
                        return Err(e);
                    }
                    MalformedLinePolicy::Skip => {
                        debug!(line = line.trim(), "skipping invalid rule line");
                    }
                },
            }
        }

        Ok(entries)
    }
}

/// Convert with the default (abort) malformed-line policy.
pub fn convert(params: &ConversionParams, content: &str) -> Result<Vec<String>, RulesError> {
    Transcoder::default().convert(params, content)
}

/// Extract ASN entries from any dialect.
///
/// Accepts `IP-ASN,7497`, `IP-ASN , 7586 // note` and
/// `- IP-ASN,4134,DIRECT,no-resolve // note`. Lines starting with `#` or
/// `//` are comments. Fails with `NoMatches` when nothing is found.
pub fn parse_asn_entries(content: &str) -> Result<Vec<RuleEntry>, RulesError> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let Some(caps) = IP_ASN.captures(line) else {
            continue;
        };

        match caps[1].parse::<u32>() {
            Ok(number) => entries.push(RuleEntry::Asn { number }),
            Err(_) => debug!(line, "ASN number out of range"),
        }
    }

    if entries.is_empty() {
        return Err(RulesError::NoMatches);
    }

    Ok(entries)
}
