//! Payload extraction from fetched rule documents.

use crate::fetcher::FetchOutcome;
use crate::source::RuleSource;

/// Marker that opens the rule-entry section of a document.
pub const PAYLOAD_MARKER: &str = "payload:";

/// Return the text following the first `payload:` marker, if any.
pub fn payload_section(content: &str) -> Option<&str> {
    content
        .find(PAYLOAD_MARKER)
        .map(|found| &content[found + PAYLOAD_MARKER.len()..])
}

/// Build the merge fragment for one source.
///
/// The fragment is a `# <source>` provenance line followed by every line of
/// the payload section with surrounding whitespace removed, each terminated
/// by `\n`. Blank lines at the edges of the section are dropped. A failed
/// fetch or a document without a marker yields the provenance line alone.
pub fn extract_fragment(source: &RuleSource, body: Option<&str>) -> String {
    let mut fragment = format!("# {}\n", source);

    let Some(section) = body.and_then(payload_section) else {
        return fragment;
    };

    for line in section.trim().lines() {
        fragment.push_str(line.trim());
        fragment.push('\n');
    }

    fragment
}

/// Build the merge fragment for a fetch outcome.
pub fn extract_payload(outcome: &FetchOutcome) -> String {
    let body = outcome.succeeded.then_some(outcome.body.as_str());
    extract_fragment(&outcome.source, body)
}
