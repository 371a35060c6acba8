//! Data types for segments and search results.

use serde::{Deserialize, Serialize};

/// One retrievable unit of a document: a single non-blank page.
///
/// `text` already starts with the provenance label (`"[Page 2] ..."`), so the
/// source attribution survives once the segment is pasted into a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-based page number in the source document, blank pages included.
    pub page: usize,
    /// Human-readable provenance, e.g. `Page 2`.
    pub provenance_label: String,
    /// Labeled page text.
    pub text: String,
}

impl Segment {
    /// Build the segment for page `page` (1-based) from its extracted text.
    pub fn from_page(page: usize, body: &str) -> Self {
        let provenance_label = format!("Page {page}");
        let text = format!("[{provenance_label}] {body}");
        Self { page, provenance_label, text }
    }
}

/// A retrieved [`Segment`] paired with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Position of the segment in the index.
    pub index: usize,
    /// The retrieved segment.
    pub segment: Segment,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
