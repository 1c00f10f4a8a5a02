//! Convenience wiring: two PDF byte buffers in, annotated report out.

use compare_engine::annotate::CompareConfig;
use compare_engine::traits::ChangeDescriber;
use compare_engine::{run_pipeline, CompareError};
use shared_types::ComparisonReport;

use crate::annotate::PdfTarget;
use crate::extract::PdfExtractor;

/// Compare two versions of a PDF and annotate the newer one.
pub fn compare_pdfs(
    old_bytes: &[u8],
    new_bytes: &[u8],
    describer: &impl ChangeDescriber,
    config: &CompareConfig,
) -> Result<ComparisonReport, CompareError> {
    let extractor = PdfExtractor::new();
    let mut target = PdfTarget::load(new_bytes)?;
    run_pipeline(
        &extractor,
        describer,
        &mut target,
        old_bytes,
        new_bytes,
        config,
    )
}
