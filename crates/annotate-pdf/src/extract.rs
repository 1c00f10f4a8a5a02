//! Per-page line extraction.

use compare_engine::{CompareError, PageTextExtractor};
use lopdf::Document;

use crate::content;

/// Extracts trimmed, empty-filtered text lines per page, in physical order.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTextExtractor for PdfExtractor {
    fn extract_lines(&self, pdf_bytes: &[u8]) -> Result<Vec<Vec<String>>, CompareError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| CompareError::CorruptDocument(e.to_string()))?;
        extract_from_document(&doc)
    }
}

/// Extraction over a pre-parsed document (avoids double-parsing when the
/// caller already holds one).
pub fn extract_from_document(doc: &Document) -> Result<Vec<Vec<String>>, CompareError> {
    let mut pages = Vec::new();
    // get_pages is keyed by page number, so iteration is in page order.
    for (_page_num, page_id) in doc.get_pages() {
        let lines = content::page_text_lines(doc, page_id)?;
        pages.push(
            lines
                .into_iter()
                .map(|line| line.text.trim().to_string())
                .filter(|text| !text.is_empty())
                .collect(),
        );
    }
    Ok(pages)
}
