//! Build a domain rule document from a hosts file.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::extractor::PAYLOAD_MARKER;
use crate::source::RuleSource;

/// Host names of a hosts file: the last whitespace-separated field of every
/// non-empty, non-comment line.
pub fn parse_hosts(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next_back())
        .map(str::to_string)
        .collect()
}

/// Render the hosts of `content` as a domain rule document.
pub fn hosts_to_rules(source: &RuleSource, content: &str, generated_at: DateTime<Utc>) -> String {
    let hosts = parse_hosts(content);

    let mut lines = vec![
        "# NAME: Clash rules from hosts".to_string(),
        "# BEHAVIOR: domain".to_string(),
        format!("# SOURCE: {}", source),
        format!("# COUNT: {}", hosts.len()),
        format!(
            "# GENERATED: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        String::new(),
        PAYLOAD_MARKER.to_string(),
    ];
    lines.extend(hosts.iter().map(|host| format!("  - \"{}\"", host)));

    lines.join("\n")
}
