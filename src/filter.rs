//! Drop rule lines by domain prefix, suffix or keyword.

use tracing::debug;

/// Wildcard marker used by list dialects for "this domain and its subdomains".
const WILDCARD: &str = "+.";

/// Line filter built from comma-separated pattern lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFilter {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    keywords: Vec<String>,
}

fn split_patterns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl RuleFilter {
    /// Build a filter. Each prefix also matches with a `+.` wildcard in front.
    pub fn new(prefixes: &str, suffixes: &str, keywords: &str) -> Self {
        let plain = split_patterns(prefixes);
        let mut prefixes = plain.clone();
        for prefix in &plain {
            let wildcard = if prefix.starts_with(WILDCARD) {
                prefix.clone()
            } else {
                format!("{}{}", WILDCARD, prefix)
            };
            if !prefixes.contains(&wildcard) {
                prefixes.push(wildcard);
            }
        }

        Self {
            prefixes,
            suffixes: split_patterns(suffixes),
            keywords: split_patterns(keywords),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.suffixes.is_empty() && self.keywords.is_empty()
    }

    /// Whether `line` should be removed.
    pub fn rejects(&self, line: &str) -> bool {
        let domain = line.split('"').nth(1).unwrap_or(line);

        self.prefixes.iter().any(|p| domain.starts_with(p.as_str()))
            || self.suffixes.iter().any(|s| domain.ends_with(s.as_str()))
            || self.keywords.iter().any(|k| domain.contains(k.as_str()))
    }

    /// Filter a whole document, keeping line structure for surviving lines.
    pub fn apply(&self, content: &str) -> String {
        let mut dropped = 0usize;
        let kept: Vec<&str> = content
            .split('\n')
            .filter(|line| {
                let reject = self.rejects(line);
                dropped += usize::from(reject);
                !reject
            })
            .collect();

        debug!(dropped, kept = kept.len(), "filtered rule document");
        kept.join("\n")
    }
}
