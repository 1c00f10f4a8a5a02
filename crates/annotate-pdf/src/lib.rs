//! lopdf-backed implementation of the comparison pipeline's PDF collaborators
//!
//! One content-stream walker feeds both per-page line extraction and snippet
//! search, so the text the diff runs on and the text the search relocates
//! are decoded identically and a change that was extracted can be found
//! again.
//!
//! - `content`: positioned text runs and baseline-grouped lines
//! - `extract`: [`PdfExtractor`], the page text extractor
//! - `search`: snippet occurrences as page rectangles
//! - `annotate`: [`PdfTarget`], highlights, notes, markers, serialization
//! - `compare`: [`compare_pdfs`], convenience wiring for callers

pub mod annotate;
pub mod compare;
pub mod content;
pub mod extract;
pub mod search;

pub use annotate::PdfTarget;
pub use compare::compare_pdfs;
pub use extract::PdfExtractor;
