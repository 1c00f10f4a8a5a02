//! Collaborator interfaces consumed by the pipeline.

use shared_types::{Change, Point, Rect, Rgb};

use crate::error::CompareError;

/// Per-page text extraction from raw PDF bytes.
///
/// Implementations return one inner vector per page, with lines trimmed and
/// empty lines already filtered out, in physical page/line order.
pub trait PageTextExtractor {
    fn extract_lines(&self, pdf_bytes: &[u8]) -> Result<Vec<Vec<String>>, CompareError>;
}

/// The mutable document being annotated, owned exclusively for the duration
/// of one comparison.
///
/// Pages are addressed 1-based everywhere to match [`Change::page`].
pub trait AnnotateTarget {
    fn page_count(&self) -> usize;

    /// All rectangles on `page` covering an occurrence of `snippet`.
    fn search_text(&self, page: u32, snippet: &str) -> Result<Vec<Rect>, CompareError>;

    fn add_highlight(&mut self, page: u32, rect: Rect, color: Rgb) -> Result<(), CompareError>;

    /// Sticky note anchored at `at`.
    fn add_note(&mut self, page: u32, at: Point, text: &str) -> Result<(), CompareError>;

    /// Free-text marker near the top of `page` (used for deletion summaries).
    fn add_page_marker(&mut self, page: u32, text: &str) -> Result<(), CompareError>;

    /// Serialize the mutated document. Fatal on failure.
    fn save(&mut self) -> Result<Vec<u8>, CompareError>;
}

/// Produces the one-line note text for a change. Must not fail: internal
/// errors degrade to a generic label.
pub trait ChangeDescriber {
    fn describe(&self, change: &Change) -> String;
}
