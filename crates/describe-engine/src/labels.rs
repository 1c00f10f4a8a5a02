//! Label classification for `label: value` form lines.
//!
//! The document corpus is bilingual (English/Dutch), so the keyword tables
//! cover both.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// (field key, label keyword pattern), checked in order.
    static ref LABEL_PATTERNS: Vec<(&'static str, Regex)> = vec![
        (
            "price",
            Regex::new(r"(?i)\b(price|amount|prijs|bedrag|kosten|aanneemsom|tarief)\b").unwrap(),
        ),
        ("date", Regex::new(r"(?i)\b(date|datum)\b").unwrap()),
        ("email", Regex::new(r"(?i)\b(e[- ]?mail|mail)\b").unwrap()),
        ("phone", Regex::new(r"(?i)\b(tel|telefoon|phone)\b").unwrap()),
        (
            "contact",
            Regex::new(r"(?i)\b(contact|contactpersoon|name|naam)\b").unwrap(),
        ),
        (
            "project",
            Regex::new(r"(?i)\b(project|projectnaam|opdracht|title|titel)\b").unwrap(),
        ),
    ];
}

/// Placeholder tokens that mean "not filled in yet".
pub const UNKNOWN_TOKENS: &[&str] = &[
    "",
    "-",
    "—",
    "n.v.t.",
    "nvt",
    "n/a",
    "na",
    "tbd",
    "onbekend",
    "niet ingevuld",
];

/// Split on the first `:` into a trimmed `(label, value)` pair; lines
/// without a colon have no label.
pub fn split_label_value(line: &str) -> (Option<&str>, &str) {
    match line.split_once(':') {
        Some((label, value)) => (Some(label.trim()), value.trim()),
        None => (None, line.trim()),
    }
}

/// Classify a label against the keyword table.
pub fn label_key(label: &str) -> Option<&'static str> {
    LABEL_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(label))
        .map(|(key, _)| *key)
}

pub fn is_unknown_value(value: &str) -> bool {
    let normalized = value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    UNKNOWN_TOKENS.contains(&normalized.as_str())
}
