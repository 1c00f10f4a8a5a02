//! End-to-end orchestration of one comparison run.
//!
//! Strictly sequential: the diff needs both complete tagged sequences and
//! the annotator needs the complete classified change list. The caller owns
//! the collaborator handles and the annotate target (opened over the new
//! document's bytes).

use shared_types::{AnnotationResult, ChangeKind, ComparisonReport, ComparisonStats};
use tracing::{debug, info, warn};

use crate::affinity::document_affinity;
use crate::annotate::{annotate_changes, CompareConfig};
use crate::changelog::render_changelog;
use crate::classify::classify;
use crate::diff::diff_lines;
use crate::error::CompareError;
use crate::tagger::tag_pages;
use crate::traits::{AnnotateTarget, ChangeDescriber, PageTextExtractor};

/// Compare two document versions and annotate `target` (which must wrap
/// `new_bytes`).
///
/// Returns either a complete report or a single fatal error; no
/// partial-document output is produced.
pub fn run_pipeline<X, D, T>(
    extractor: &X,
    describer: &D,
    target: &mut T,
    old_bytes: &[u8],
    new_bytes: &[u8],
    config: &CompareConfig,
) -> Result<ComparisonReport, CompareError>
where
    X: PageTextExtractor,
    D: ChangeDescriber,
    T: AnnotateTarget,
{
    let old_pages = extractor.extract_lines(old_bytes)?;
    let new_pages = extractor.extract_lines(new_bytes)?;
    debug!(
        old_pages = old_pages.len(),
        new_pages = new_pages.len(),
        "extracted page text"
    );

    let affinity = document_affinity(&old_pages, &new_pages);
    if affinity.is_suspect() {
        warn!(
            global = affinity.global,
            title = affinity.title,
            "documents differ strongly; they may not be versions of the same document"
        );
    }

    let old_lines = tag_pages(&old_pages);
    let new_lines = tag_pages(&new_pages);
    let ops = diff_lines(&old_lines, &new_lines);
    let classified = classify(&ops, &old_lines, &new_lines);
    debug!(
        changes = classified.changes.len(),
        deletion_pages = classified.deletions.len(),
        "classified edit operations"
    );

    let outcome = annotate_changes(
        target,
        &classified.changes,
        &classified.deletions,
        describer,
        config,
    );
    let document_bytes = target.save()?;

    let stats = ComparisonStats {
        inserted_lines: count_kind(&classified.changes, ChangeKind::Insert),
        replaced_lines: count_kind(&classified.changes, ChangeKind::Replace),
        deleted_lines: classified.deletions.iter().map(|d| d.count).sum(),
        highlights: outcome.highlights,
        not_located: outcome.not_located,
    };
    info!(
        inserted = stats.inserted_lines,
        replaced = stats.replaced_lines,
        deleted = stats.deleted_lines,
        highlights = stats.highlights,
        not_located = stats.not_located,
        "comparison complete"
    );

    Ok(ComparisonReport {
        result: AnnotationResult {
            document_bytes,
            highlight_count: outcome.highlights,
        },
        stats,
        affinity,
        changelog: render_changelog(&classified.changes, &classified.deletions),
    })
}

fn count_kind(changes: &[shared_types::Change], kind: ChangeKind) -> u32 {
    changes.iter().filter(|c| c.kind == kind).count() as u32
}
