//! Multi-source merge: fetch every source, extract payloads, concatenate.

use std::fmt;

use tracing::info;

use crate::extractor::{extract_payload, PAYLOAD_MARKER};
use crate::fetcher::{Fetcher, Transport};
use crate::source::RuleSource;

/// One composite rule document built from an ordered source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDocument {
    pub sources: Vec<RuleSource>,
    /// Source count line, one `# <url>` line per source and the `payload:` marker.
    pub header: String,
    /// Concatenated fragments, in the order of `sources`.
    pub body: String,
}

impl MergedDocument {
    /// Assemble a document from sources and their already extracted fragments.
    pub fn assemble(sources: Vec<RuleSource>, fragments: &[String]) -> Self {
        let header = render_header(&sources);
        let body = fragments.concat();
        Self {
            sources,
            header,
            body,
        }
    }
}

impl fmt::Display for MergedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        f.write_str(&self.body)
    }
}

fn render_header(sources: &[RuleSource]) -> String {
    let mut header = format!(
        "# Merged rules for the following {} subscription URLs:\n",
        sources.len()
    );
    for source in sources {
        header.push_str("# ");
        header.push_str(source.as_str());
        header.push('\n');
    }
    header.push_str(PAYLOAD_MARKER);
    header.push('\n');
    header
}

/// Builds merged documents on top of a [`Fetcher`].
pub struct Merger<T: Transport> {
    fetcher: Fetcher<T>,
}

impl<T: Transport> Merger<T> {
    pub fn new(fetcher: Fetcher<T>) -> Self {
        Self { fetcher }
    }

    /// Merge `sources` into one document. Never fails: a source that could
    /// not be fetched contributes only its provenance line.
    pub async fn merge(&self, sources: &[RuleSource]) -> MergedDocument {
        let outcomes = self.fetcher.fetch_all(sources).await;

        let failed = outcomes.iter().filter(|o| !o.succeeded).count();
        let fragments: Vec<String> = outcomes.iter().map(extract_payload).collect();
        let document = MergedDocument::assemble(sources.to_vec(), &fragments);

        info!(
            sources = sources.len(),
            failed,
            bytes = document.header.len() + document.body.len(),
            "merged rule documents"
        );

        document
    }
}
