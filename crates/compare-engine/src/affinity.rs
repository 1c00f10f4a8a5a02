//! Sanity check that two uploads are plausibly versions of one document.

use shared_types::DocumentAffinity;
use similar::TextDiff;

/// Character-level similarity over the full texts and over the first title
/// lines. The comparison always proceeds; callers use
/// [`DocumentAffinity::is_suspect`] to warn.
pub fn document_affinity(old_pages: &[Vec<String>], new_pages: &[Vec<String>]) -> DocumentAffinity {
    let old_text = join_pages(old_pages);
    let new_text = join_pages(new_pages);
    let global = TextDiff::from_chars(old_text.as_str(), new_text.as_str()).ratio();

    let title = match (first_title_line(old_pages), first_title_line(new_pages)) {
        (Some(old_title), Some(new_title)) => TextDiff::from_chars(old_title, new_title).ratio(),
        _ => 0.0,
    };

    DocumentAffinity { global, title }
}

fn join_pages(pages: &[Vec<String>]) -> String {
    pages
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn first_title_line(pages: &[Vec<String>]) -> Option<&str> {
    pages
        .first()?
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Vec<Vec<String>> {
        vec![lines.iter().map(|s| s.to_string()).collect()]
    }

    #[test]
    fn test_identical_documents_have_full_affinity() {
        let pages = doc(&["Quarterly report", "Amount: 100"]);
        let affinity = document_affinity(&pages, &pages);
        assert_eq!(affinity.global, 1.0);
        assert_eq!(affinity.title, 1.0);
        assert!(!affinity.is_suspect());
    }

    #[test]
    fn test_unrelated_documents_are_suspect() {
        let old = doc(&["Quarterly report", "Amount: 100", "Totals and notes"]);
        let new = doc(&["Recipe collection", "Two eggs", "A pinch of salt"]);
        let affinity = document_affinity(&old, &new);
        assert!(affinity.is_suspect());
    }

    #[test]
    fn test_missing_title_zeroes_title_score() {
        let old: Vec<Vec<String>> = vec![vec![]];
        let new = doc(&["Quarterly report"]);
        let affinity = document_affinity(&old, &new);
        assert_eq!(affinity.title, 0.0);
    }

    #[test]
    fn test_small_edit_keeps_high_affinity() {
        let old = doc(&["Quarterly report", "Amount: 100", "Contact: unknown"]);
        let new = doc(&["Quarterly report", "Amount: 200", "Contact: unknown"]);
        let affinity = document_affinity(&old, &new);
        assert!(affinity.global > 0.9);
        assert!(!affinity.is_suspect());
    }
}
