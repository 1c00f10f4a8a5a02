//! Relocates a snippet on a page as rectangles.
//!
//! Matching runs over whitespace-normalized text, mirroring the snippet
//! selector, so a snippet derived from extracted text is found in the same
//! line it came from. Every occurrence yields a rectangle sliced
//! proportionally out of the line box.

use shared_types::Rect;

use crate::content::TextLine;

/// Descender allowance below the baseline, relative to font size.
const DESCENT_RATIO: f64 = 0.25;

pub fn search_page(lines: &[TextLine], snippet: &str) -> Vec<Rect> {
    let needle = normalize(snippet);
    if needle.is_empty() {
        return Vec::new();
    }
    let needle_chars = needle.chars().count();

    let mut rects = Vec::new();
    for line in lines {
        let haystack = normalize(&line.text);
        if haystack.is_empty() {
            continue;
        }
        let total_chars = haystack.chars().count();
        let span = line.x1 - line.x0;

        for (byte_idx, _) in haystack.match_indices(&needle) {
            let char_start = haystack[..byte_idx].chars().count();
            let start_frac = char_start as f64 / total_chars as f64;
            let width_frac = needle_chars as f64 / total_chars as f64;
            let x0 = line.x0 + start_frac * span;
            let x1 = (x0 + width_frac * span).min(line.x1);
            rects.push(Rect::new(
                x0,
                line.y - DESCENT_RATIO * line.font_size,
                x1,
                line.y + line.font_size,
            ));
        }
    }
    rects
}

fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
