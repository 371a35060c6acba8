//! Page-level document segmentation.
//!
//! A document is read as an ordered sequence of page texts ([`Pages`]) and
//! turned lazily into labeled [`Segment`]s. Blank pages still advance the page
//! counter but never produce a segment.
//!
//! Two formats are supported:
//!
//! - PDF (`.pdf`), read page by page with `lopdf`
//! - UTF-8 text (anything else), where a form feed (`\x0c`) separates pages

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use tracing::{info, warn};

use crate::document::Segment;
use crate::error::{RagError, Result};

/// Page separator for plain-text documents.
pub const PAGE_BREAK: char = '\x0c';

/// How a document's bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => DocumentFormat::Pdf,
            _ => DocumentFormat::PlainText,
        }
    }
}

/// Lazily extracted page texts of a PDF, in page order.
///
/// A page whose text cannot be extracted yields an empty string so that
/// page numbering stays aligned with the source.
pub struct PdfPages {
    document: lopdf::Document,
    page_numbers: std::vec::IntoIter<u32>,
}

impl PdfPages {
    pub fn new(document: lopdf::Document) -> Self {
        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        Self { document, page_numbers: page_numbers.into_iter() }
    }

    pub fn page_count(&self) -> usize {
        self.page_numbers.len()
    }
}

impl Iterator for PdfPages {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let number = self.page_numbers.next()?;
        Some(self.document.extract_text(&[number]).unwrap_or_else(|e| {
            warn!(page = number, error = %e, "failed to extract page text");
            String::new()
        }))
    }
}

enum PagesInner {
    Pdf(PdfPages),
    Text(std::vec::IntoIter<String>),
}

/// The ordered page texts of a document, blank pages included.
pub struct Pages {
    inner: PagesInner,
}

impl Iterator for Pages {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match &mut self.inner {
            PagesInner::Pdf(pages) => pages.next(),
            PagesInner::Text(pages) => pages.next(),
        }
    }
}

/// Labels pages and drops the blank ones.
///
/// Produced by [`segment_pages`] and [`load_segments`].
pub struct Segments<I> {
    pages: I,
    page: usize,
}

impl<I: Iterator<Item = String>> Iterator for Segments<I> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        loop {
            let body = self.pages.next()?;
            self.page += 1;
            let body = body.trim();
            if !body.is_empty() {
                return Some(Segment::from_page(self.page, body));
            }
        }
    }
}

/// Turn ordered page texts into labeled segments, numbering pages from 1.
pub fn segment_pages<I: IntoIterator<Item = String>>(pages: I) -> Segments<I::IntoIter> {
    Segments { pages: pages.into_iter(), page: 0 }
}

/// Split plain text into pages at [`PAGE_BREAK`].
pub fn split_text_pages(text: &str) -> Vec<String> {
    text.split(PAGE_BREAK).map(str::to_owned).collect()
}

fn open_error(path: &Path, e: io::Error) -> RagError {
    match e.kind() {
        io::ErrorKind::InvalidData => {
            RagError::DocumentError(format!("{} is not valid UTF-8 text: {e}", path.display()))
        }
        _ => {
            warn!(path = %path.display(), error = %e, "cannot open document");
            RagError::ResourceNotFound { path: path.to_path_buf() }
        }
    }
}

/// Open a document and return its page texts.
///
/// # Errors
///
/// - [`RagError::ResourceNotFound`] if the file is missing or cannot be opened
/// - [`RagError::DocumentError`] if the file is not a readable PDF or UTF-8 text
pub fn open_pages(path: impl AsRef<Path>) -> Result<Pages> {
    let path = path.as_ref();
    let inner = match DocumentFormat::from_path(path) {
        DocumentFormat::Pdf => {
            let file = File::open(path).map_err(|e| open_error(path, e))?;
            let document = lopdf::Document::load_from(BufReader::new(file)).map_err(|e| {
                RagError::DocumentError(format!("failed to parse PDF {}: {e}", path.display()))
            })?;
            let pages = PdfPages::new(document);
            info!(path = %path.display(), page_count = pages.page_count(), "loaded PDF");
            PagesInner::Pdf(pages)
        }
        DocumentFormat::PlainText => {
            let text = std::fs::read_to_string(path).map_err(|e| open_error(path, e))?;
            let pages = split_text_pages(&text);
            info!(path = %path.display(), page_count = pages.len(), "loaded text document");
            PagesInner::Text(pages.into_iter())
        }
    };
    Ok(Pages { inner })
}

/// Open a document and lazily segment it.
///
/// Callers must treat an empty sequence as "nothing to index" and stop
/// before building an index.
pub fn load_segments(path: impl AsRef<Path>) -> Result<Segments<Pages>> {
    Ok(segment_pages(open_pages(path)?))
}
