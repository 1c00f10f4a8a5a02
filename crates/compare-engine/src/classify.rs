//! Partitions edit operations into annotation work lists.

use std::collections::BTreeMap;

use shared_types::{Change, ChangeKind, DeletionSummary, EditOp, TaggedLine};

/// The classifier's output: locatable changes plus per-page deleted-line
/// counts (deleted text has nowhere to be highlighted in the new document).
#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub changes: Vec<Change>,
    /// Ascending page order.
    pub deletions: Vec<DeletionSummary>,
}

/// Derive changes from an edit script.
///
/// Replace ranges of unequal length zip positionally; excess new lines are
/// classified as plain inserts and excess old lines count as deletions, so
/// every line of every op is accounted for.
pub fn classify(ops: &[EditOp], old: &[TaggedLine], new: &[TaggedLine]) -> Classified {
    let mut changes = Vec::new();
    let mut deleted: BTreeMap<u32, u32> = BTreeMap::new();

    for op in ops {
        match op {
            EditOp::Equal { .. } => {}
            EditOp::Insert { new: range } => {
                for line in &new[range.start..range.end] {
                    changes.push(insert_change(line));
                }
            }
            EditOp::Delete { old: range } => {
                for line in &old[range.start..range.end] {
                    *deleted.entry(line.page).or_insert(0) += 1;
                }
            }
            EditOp::Replace {
                old: old_range,
                new: new_range,
            } => {
                let paired = old_range.len().min(new_range.len());
                let old_lines = &old[old_range.start..old_range.end];
                let new_lines = &new[new_range.start..new_range.end];

                for (old_line, new_line) in old_lines.iter().zip(new_lines).take(paired) {
                    changes.push(Change {
                        kind: ChangeKind::Replace,
                        page: new_line.page,
                        old_text: Some(old_line.text.clone()),
                        new_text: new_line.text.clone(),
                    });
                }
                for line in &new_lines[paired..] {
                    changes.push(insert_change(line));
                }
                for line in &old_lines[paired..] {
                    *deleted.entry(line.page).or_insert(0) += 1;
                }
            }
        }
    }

    Classified {
        changes,
        deletions: deleted
            .into_iter()
            .map(|(page, count)| DeletionSummary { page, count })
            .collect(),
    }
}

fn insert_change(line: &TaggedLine) -> Change {
    Change {
        kind: ChangeKind::Insert,
        page: line.page,
        old_text: None,
        new_text: line.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_lines;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use shared_types::LineRange;

    fn lines(page: u32, texts: &[&str]) -> Vec<TaggedLine> {
        texts.iter().map(|t| TaggedLine::new(page, *t)).collect()
    }

    #[test]
    fn test_insert_op_emits_one_change_per_line() {
        let new = lines(2, &["added one", "added two"]);
        let ops = vec![EditOp::Insert {
            new: LineRange::new(0, 2),
        }];
        let classified = classify(&ops, &[], &new);
        assert_eq!(classified.changes.len(), 2);
        assert!(classified
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::Insert && c.page == 2 && c.old_text.is_none()));
        assert!(classified.deletions.is_empty());
    }

    #[test]
    fn test_delete_op_counts_per_page() {
        let mut old = lines(1, &["gone"]);
        old.extend(lines(3, &["also gone", "and this"]));
        let ops = vec![EditOp::Delete {
            old: LineRange::new(0, 3),
        }];
        let classified = classify(&ops, &old, &[]);
        assert!(classified.changes.is_empty());
        assert_eq!(
            classified.deletions,
            vec![
                DeletionSummary { page: 1, count: 1 },
                DeletionSummary { page: 3, count: 2 },
            ]
        );
    }

    #[test]
    fn test_replace_zips_pairs() {
        let old = lines(1, &["Amount: 100"]);
        let new = lines(1, &["Amount: 200"]);
        let ops = vec![EditOp::Replace {
            old: LineRange::new(0, 1),
            new: LineRange::new(0, 1),
        }];
        let classified = classify(&ops, &old, &new);
        assert_eq!(
            classified.changes,
            vec![Change {
                kind: ChangeKind::Replace,
                page: 1,
                old_text: Some("Amount: 100".to_string()),
                new_text: "Amount: 200".to_string(),
            }]
        );
    }

    #[test]
    fn test_replace_excess_new_lines_become_inserts() {
        let old = lines(1, &["one"]);
        let new = lines(1, &["uno", "dos", "tres"]);
        let ops = vec![EditOp::Replace {
            old: LineRange::new(0, 1),
            new: LineRange::new(0, 3),
        }];
        let classified = classify(&ops, &old, &new);
        assert_eq!(classified.changes.len(), 3);
        assert_eq!(classified.changes[0].kind, ChangeKind::Replace);
        assert_eq!(classified.changes[1].kind, ChangeKind::Insert);
        assert_eq!(classified.changes[2].kind, ChangeKind::Insert);
        assert!(classified.deletions.is_empty());
    }

    #[test]
    fn test_replace_excess_old_lines_become_deletions() {
        let old = lines(2, &["one", "two", "three"]);
        let new = lines(2, &["uno"]);
        let ops = vec![EditOp::Replace {
            old: LineRange::new(0, 3),
            new: LineRange::new(0, 1),
        }];
        let classified = classify(&ops, &old, &new);
        assert_eq!(classified.changes.len(), 1);
        assert_eq!(
            classified.deletions,
            vec![DeletionSummary { page: 2, count: 2 }]
        );
    }

    #[test]
    fn test_equal_ops_are_ignored() {
        let old = lines(1, &["same"]);
        let ops = vec![EditOp::Equal {
            old: LineRange::new(0, 1),
            new: LineRange::new(0, 1),
        }];
        let classified = classify(&ops, &old, &old);
        assert!(classified.changes.is_empty());
        assert!(classified.deletions.is_empty());
    }

    fn line_seq() -> impl Strategy<Value = Vec<TaggedLine>> {
        prop::collection::vec("[xyz]{0,2}", 0..20).prop_map(|texts| {
            texts
                .into_iter()
                .enumerate()
                .map(|(i, t)| TaggedLine::new(i as u32 / 5 + 1, t))
                .collect()
        })
    }

    proptest! {
        /// Every line of every non-Equal op is accounted for: Insert/Delete
        /// contribute their range length, Replace contributes
        /// max(old_len, new_len).
        #[test]
        fn classifier_covers_all_ops(old in line_seq(), new in line_seq()) {
            let ops = diff_lines(&old, &new);
            let classified = classify(&ops, &old, &new);

            let expected: usize = ops
                .iter()
                .map(|op| match op {
                    EditOp::Equal { .. } => 0,
                    EditOp::Insert { new } => new.len(),
                    EditOp::Delete { old } => old.len(),
                    EditOp::Replace { old, new } => old.len().max(new.len()),
                })
                .sum();
            let deleted: u32 = classified.deletions.iter().map(|d| d.count).sum();
            let emitted = classified.changes.len() + deleted as usize;

            prop_assert_eq!(emitted, expected);
        }

        /// Deletion summaries come out aggregated, in ascending page order,
        /// and never with a zero count.
        #[test]
        fn deletions_are_aggregated(old in line_seq(), new in line_seq()) {
            let ops = diff_lines(&old, &new);
            let classified = classify(&ops, &old, &new);
            let pages: Vec<u32> = classified.deletions.iter().map(|d| d.page).collect();
            let mut sorted = pages.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(pages, sorted);
            prop_assert!(classified.deletions.iter().all(|d| d.count > 0));
        }
    }
}
