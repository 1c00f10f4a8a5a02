//! Token-level change detection: numbers, dates, emails, phone numbers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Number with optional thousands separators (`.` or space) and a
    /// decimal comma or period.
    static ref NUMBER: Regex =
        Regex::new(r"\b\d{1,3}(?:[.\s]\d{3})*(?:[.,]\d+)?\b").unwrap();

    /// `D-M-YYYY` or `YYYY-M-D` with `-`, `/` or `.` separators.
    static ref DATE: Regex = Regex::new(
        r"\b(\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}|\d{4}[-/.]\d{1,2}[-/.]\d{1,2})\b"
    )
    .unwrap();

    static ref EMAIL: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();

    static ref PHONE: Regex = Regex::new(r"\+?\d[\d\s\-()]{6,}\d").unwrap();
}

pub fn first_number(text: &str) -> Option<&str> {
    NUMBER.find(text).map(|m| m.as_str())
}

pub fn first_date(text: &str) -> Option<&str> {
    DATE.find(text).map(|m| m.as_str())
}

/// First number of each side, when both exist and differ.
pub fn number_change<'a>(old: &'a str, new: &'a str) -> Option<(&'a str, &'a str)> {
    match (first_number(old), first_number(new)) {
        (Some(o), Some(n)) if o != n => Some((o, n)),
        _ => None,
    }
}

/// First date of each side, when both exist and differ.
pub fn date_change<'a>(old: &'a str, new: &'a str) -> Option<(&'a str, &'a str)> {
    match (first_date(old), first_date(new)) {
        (Some(o), Some(n)) if o != n => Some((o, n)),
        _ => None,
    }
}

/// An email or phone number newly present in `new` and absent from `old`.
pub fn contact_filled(old: &str, new: &str) -> Option<String> {
    if EMAIL.find(old).is_none() {
        if let Some(found) = EMAIL.find(new) {
            return Some(format!("Email filled: {}", found.as_str()));
        }
    }
    if PHONE.find(old).is_none() {
        if let Some(found) = PHONE.find(new) {
            return Some(format!("Phone filled: {}", found.as_str()));
        }
    }
    None
}
