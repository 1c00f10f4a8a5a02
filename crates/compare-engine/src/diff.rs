//! Line-level diff between two tagged sequences.
//!
//! Alignment runs over the `text` projection only; the `page` field rides
//! along but never participates in equality. `similar`'s Myers diff already
//! groups opcodes into maximal Equal/Insert/Delete/Replace runs and applies
//! no junk heuristics, so repeated common lines ("—", page footers) are
//! aligned like any other line.

use shared_types::{EditOp, LineRange, TaggedLine};
use similar::{capture_diff_slices, Algorithm, DiffOp};

/// Minimal edit script between `old` and `new`.
///
/// The returned ops partition both sequences: concatenating the old ranges
/// in order reconstructs `old` exactly, likewise for the new ranges.
pub fn diff_lines(old: &[TaggedLine], new: &[TaggedLine]) -> Vec<EditOp> {
    let old_texts: Vec<&str> = old.iter().map(|line| line.text.as_str()).collect();
    let new_texts: Vec<&str> = new.iter().map(|line| line.text.as_str()).collect();

    capture_diff_slices(Algorithm::Myers, &old_texts, &new_texts)
        .into_iter()
        .map(to_edit_op)
        .collect()
}

fn to_edit_op(op: DiffOp) -> EditOp {
    match op {
        DiffOp::Equal {
            old_index,
            new_index,
            len,
        } => EditOp::Equal {
            old: LineRange::new(old_index, old_index + len),
            new: LineRange::new(new_index, new_index + len),
        },
        DiffOp::Delete {
            old_index, old_len, ..
        } => EditOp::Delete {
            old: LineRange::new(old_index, old_index + old_len),
        },
        DiffOp::Insert {
            new_index, new_len, ..
        } => EditOp::Insert {
            new: LineRange::new(new_index, new_index + new_len),
        },
        DiffOp::Replace {
            old_index,
            old_len,
            new_index,
            new_len,
        } => EditOp::Replace {
            old: LineRange::new(old_index, old_index + old_len),
            new: LineRange::new(new_index, new_index + new_len),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn lines(texts: &[&str]) -> Vec<TaggedLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TaggedLine::new(i as u32 / 3 + 1, *t))
            .collect()
    }

    /// Concatenated old/new ranges must tile both sequences exactly.
    fn assert_partition(ops: &[EditOp], old_len: usize, new_len: usize) {
        let mut old_cursor = 0;
        let mut new_cursor = 0;
        for op in ops {
            match op {
                EditOp::Equal { old, new } => {
                    assert_eq!(old.start, old_cursor);
                    assert_eq!(new.start, new_cursor);
                    assert_eq!(old.len(), new.len());
                    old_cursor = old.end;
                    new_cursor = new.end;
                }
                EditOp::Insert { new } => {
                    assert_eq!(new.start, new_cursor);
                    new_cursor = new.end;
                }
                EditOp::Delete { old } => {
                    assert_eq!(old.start, old_cursor);
                    old_cursor = old.end;
                }
                EditOp::Replace { old, new } => {
                    assert_eq!(old.start, old_cursor);
                    assert_eq!(new.start, new_cursor);
                    old_cursor = old.end;
                    new_cursor = new.end;
                }
            }
        }
        assert_eq!(old_cursor, old_len);
        assert_eq!(new_cursor, new_len);
    }

    #[test]
    fn test_identical_sequences_are_one_equal_run() {
        let old = lines(&["a", "b", "c"]);
        let ops = diff_lines(&old, &old);
        assert_eq!(
            ops,
            vec![EditOp::Equal {
                old: LineRange::new(0, 3),
                new: LineRange::new(0, 3),
            }]
        );
    }

    #[test]
    fn test_single_replacement() {
        let old = lines(&["Title", "Amount: 100"]);
        let new = lines(&["Title", "Amount: 200"]);
        let ops = diff_lines(&old, &new);
        assert_eq!(
            ops,
            vec![
                EditOp::Equal {
                    old: LineRange::new(0, 1),
                    new: LineRange::new(0, 1),
                },
                EditOp::Replace {
                    old: LineRange::new(1, 2),
                    new: LineRange::new(1, 2),
                },
            ]
        );
    }

    #[test]
    fn test_pure_insert_and_delete() {
        let old = lines(&["a", "x", "b"]);
        let new = lines(&["a", "b", "c"]);
        let ops = diff_lines(&old, &new);
        assert_partition(&ops, old.len(), new.len());
        assert!(ops
            .iter()
            .any(|op| matches!(op, EditOp::Delete { old } if old.len() == 1)));
        assert!(ops
            .iter()
            .any(|op| matches!(op, EditOp::Insert { new } if new.len() == 1)));
    }

    #[test]
    fn test_repeated_common_lines_are_not_junk() {
        // A separator repeated on every page must still align.
        let old = lines(&["—", "a", "—", "b", "—"]);
        let new = lines(&["—", "a", "—", "b2", "—"]);
        let ops = diff_lines(&old, &new);
        assert_partition(&ops, old.len(), new.len());
        let equal_lines: usize = ops
            .iter()
            .filter_map(|op| match op {
                EditOp::Equal { old, .. } => Some(old.len()),
                _ => None,
            })
            .sum();
        assert_eq!(equal_lines, 4);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(diff_lines(&[], &[]).is_empty());
        let new = lines(&["a"]);
        let ops = diff_lines(&[], &new);
        assert_eq!(
            ops,
            vec![EditOp::Insert {
                new: LineRange::new(0, 1),
            }]
        );
    }

    fn line_seq() -> impl Strategy<Value = Vec<TaggedLine>> {
        // Small alphabet so sequences share lines and all op kinds appear.
        prop::collection::vec("[abc]{0,2}", 0..24).prop_map(|texts| {
            texts
                .into_iter()
                .enumerate()
                .map(|(i, t)| TaggedLine::new(i as u32 / 4 + 1, t))
                .collect()
        })
    }

    proptest! {
        /// Partition invariant: ranges tile both sequences with no gaps or
        /// overlaps.
        #[test]
        fn partition_invariant_holds(old in line_seq(), new in line_seq()) {
            let ops = diff_lines(&old, &new);
            assert_partition(&ops, old.len(), new.len());
        }

        /// Pure function: same inputs, same edit script.
        #[test]
        fn diff_is_idempotent(old in line_seq(), new in line_seq()) {
            let first = diff_lines(&old, &new);
            let second = diff_lines(&old, &new);
            prop_assert_eq!(first, second);
        }

        /// Equal ops only ever pair identical texts.
        #[test]
        fn equal_runs_match_texts(old in line_seq(), new in line_seq()) {
            for op in diff_lines(&old, &new) {
                if let EditOp::Equal { old: o, new: n } = op {
                    for offset in 0..o.len() {
                        prop_assert_eq!(
                            &old[o.start + offset].text,
                            &new[n.start + offset].text
                        );
                    }
                }
            }
        }
    }
}
