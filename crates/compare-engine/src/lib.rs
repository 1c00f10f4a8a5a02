//! Document version comparison core
//!
//! This crate aligns the extracted text of two PDF versions and drives the
//! annotation of the newer one:
//!
//! 1. `tagger` flattens per-page line lists into ordered tagged sequences
//! 2. `diff` computes a minimal line-level alignment (LCS)
//! 3. `classify` turns edit operations into insert/replace changes and
//!    per-page deletion counts
//! 4. `snippet` reduces changed lines to search-friendly substrings
//! 5. `annotate` walks the changes and drives a PDF search/annotate target
//!
//! The PDF library and the change-description service are collaborators
//! behind the traits in [`traits`]; `pipeline` wires the stages together.

pub mod affinity;
pub mod annotate;
pub mod changelog;
pub mod classify;
pub mod diff;
pub mod error;
pub mod pipeline;
pub mod snippet;
pub mod tagger;
pub mod traits;

pub use annotate::{CompareConfig, MatchMode, INSERT_COLOR, REPLACE_COLOR};
pub use error::CompareError;
pub use pipeline::run_pipeline;
pub use snippet::SnippetConfig;
pub use traits::{AnnotateTarget, ChangeDescriber, PageTextExtractor};
