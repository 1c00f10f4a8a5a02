//! Plain-text change report for download alongside the annotated PDF.

use shared_types::{Change, ChangeKind, DeletionSummary};

pub fn render_changelog(changes: &[Change], deletions: &[DeletionSummary]) -> String {
    let mut out = String::from("Changes relative to version 1\n");
    out.push_str("=============================\n");

    if changes.is_empty() && deletions.iter().all(|d| d.count == 0) {
        out.push_str("No changes detected.\n");
        return out;
    }

    for change in changes {
        match change.kind {
            ChangeKind::Insert => {
                out.push_str(&format!("p{} [inserted] {}\n", change.page, change.new_text));
            }
            ChangeKind::Replace => {
                let old = change.old_text.as_deref().unwrap_or("");
                out.push_str(&format!(
                    "p{} [replaced] {} (was: {})\n",
                    change.page, change.new_text, old
                ));
            }
        }
    }
    for summary in deletions {
        if summary.count > 0 {
            out.push_str(&format!(
                "p{} -{} line(s) removed\n",
                summary.page, summary.count
            ));
        }
    }
    out
}
