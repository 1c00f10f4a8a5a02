//! Reduces a changed line to a search-friendly substring.
//!
//! Short or ambiguous snippets cause false-positive matches or zero matches
//! in the PDF text search, so anything below `min_len` is reported as
//! unsearchable (empty string) and the annotator skips that change.

#[derive(Debug, Clone, Copy)]
pub struct SnippetConfig {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            min_len: 12,
            max_len: 80,
        }
    }
}

/// Collapse whitespace runs to single spaces and trim; when longer than
/// `max_len` characters, keep the centered `max_len`-character substring
/// (centering avoids biasing toward a line's boilerplate prefix or suffix).
/// Returns the empty string when the result is shorter than `min_len`.
pub fn search_snippet(text: &str, config: &SnippetConfig) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = collapsed.chars().collect();

    let snippet: String = if chars.len() > config.max_len {
        let offset = chars.len() / 2 - config.max_len / 2;
        chars[offset..offset + config.max_len].iter().collect()
    } else {
        collapsed
    };

    if snippet.chars().count() < config.min_len {
        String::new()
    } else {
        snippet
    }
}
