//! Drives the PDF target: one highlight per located occurrence, a note per
//! highlight, and per-page markers for deletions.

use shared_types::{Change, ChangeKind, DeletionSummary, Rect, Rgb};
use tracing::{debug, warn};

use crate::snippet::{search_snippet, SnippetConfig};
use crate::traits::{AnnotateTarget, ChangeDescriber};

/// Inserted lines are highlighted green.
pub const INSERT_COLOR: Rgb = Rgb::new(0.1, 0.7, 0.1);
/// Replaced lines are highlighted yellow.
pub const REPLACE_COLOR: Rgb = Rgb::new(0.95, 0.8, 0.2);

/// Whether every occurrence of a snippet gets highlighted or only the first.
///
/// A short, common snippet can over-highlight identical text elsewhere on
/// the page; `FirstOnly` trades completeness for precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    AllOccurrences,
    FirstOnly,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompareConfig {
    pub snippet: SnippetConfig,
    pub match_mode: MatchMode,
}

/// Highlights drawn and changes that could not be visually located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotateOutcome {
    pub highlights: u32,
    pub not_located: u32,
}

/// Annotate every classified change into `target`.
///
/// A single change failing to locate (empty snippet, page out of range,
/// search error, zero matches) is skipped and counted; it never aborts the
/// batch.
pub fn annotate_changes<T, D>(
    target: &mut T,
    changes: &[Change],
    deletions: &[DeletionSummary],
    describer: &D,
    config: &CompareConfig,
) -> AnnotateOutcome
where
    T: AnnotateTarget,
    D: ChangeDescriber,
{
    let mut outcome = AnnotateOutcome::default();
    let page_count = target.page_count() as u32;

    for change in changes {
        let snippet = search_snippet(&change.new_text, &config.snippet);
        if snippet.is_empty() {
            debug!(page = change.page, "snippet too short to search, skipping change");
            outcome.not_located += 1;
            continue;
        }
        if change.page < 1 || change.page > page_count {
            warn!(
                page = change.page,
                page_count, "change targets a page outside the document, skipping"
            );
            outcome.not_located += 1;
            continue;
        }

        let rects = match target.search_text(change.page, &snippet) {
            Ok(rects) => rects,
            Err(err) => {
                warn!(page = change.page, %err, "snippet search failed, skipping change");
                outcome.not_located += 1;
                continue;
            }
        };
        if rects.is_empty() {
            debug!(page = change.page, snippet = %snippet, "snippet not found on page");
            outcome.not_located += 1;
            continue;
        }

        let color = match change.kind {
            ChangeKind::Insert => INSERT_COLOR,
            ChangeKind::Replace => REPLACE_COLOR,
        };
        let note = describer.describe(change);

        let selected: &[Rect] = match config.match_mode {
            MatchMode::AllOccurrences => &rects,
            MatchMode::FirstOnly => &rects[..1],
        };
        for rect in selected {
            if let Err(err) = target.add_highlight(change.page, *rect, color) {
                warn!(page = change.page, %err, "failed to draw highlight");
                continue;
            }
            if let Err(err) = target.add_note(change.page, rect.top_right(), &note) {
                warn!(page = change.page, %err, "failed to attach note");
            }
            outcome.highlights += 1;
        }
    }

    for summary in deletions {
        if summary.count == 0 {
            continue;
        }
        if summary.page < 1 || summary.page > page_count {
            warn!(
                page = summary.page,
                page_count, "deletion summary targets a page outside the document, skipping"
            );
            continue;
        }
        let text = format!(
            "-{} line(s) removed relative to version 1",
            summary.count
        );
        if let Err(err) = target.add_page_marker(summary.page, &text) {
            warn!(page = summary.page, %err, "failed to add deletion marker");
        }
    }

    outcome
}
