//! Change description engine
//!
//! Produces the one-line note text attached to each highlight. Deterministic
//! heuristics run first on every call (cost and latency control); only when
//! none of them fires is the completion fallback consulted, and any failure
//! there degrades to a generic label. The fallback client is injected by the
//! caller; a [`Describer`] without one is fully deterministic.

pub mod detect;
pub mod labels;
pub mod llm;

use compare_engine::traits::ChangeDescriber;
use shared_types::{Change, ChangeKind};
use thiserror::Error;
use tracing::warn;

use crate::llm::CompletionClient;

/// Errors from the completion fallback. These never escape [`Describer`]:
/// every failure path degrades to a generic label.
#[derive(Error, Debug)]
pub enum DescribeError {
    #[error("Could not connect to completion endpoint at {0}")]
    Connection(String),

    #[error("Completion request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Completion endpoint returned status {status}: {body}")]
    EndpointError { status: u16, body: String },

    #[error("Failed to parse completion response: {0}")]
    ResponseParsing(String),
}

const SYSTEM_PROMPT: &str = "Answer with the short description only.";

/// Describes changes: heuristics first, completion fallback second, generic
/// label last.
pub struct Describer {
    fallback: Option<Box<dyn CompletionClient>>,
}

impl Describer {
    /// Deterministic mode: heuristics plus generic labels, no network.
    pub fn heuristics_only() -> Self {
        Self { fallback: None }
    }

    pub fn with_fallback(client: impl CompletionClient + 'static) -> Self {
        Self {
            fallback: Some(Box::new(client)),
        }
    }

    pub fn describe_replace(&self, old: &str, new: &str) -> String {
        heuristic_description(old, new, ChangeKind::Replace)
            .unwrap_or_else(|| self.fallback_description(old, new, ChangeKind::Replace))
    }

    pub fn describe_insert(&self, new: &str) -> String {
        heuristic_description("", new, ChangeKind::Insert)
            .unwrap_or_else(|| self.fallback_description("", new, ChangeKind::Insert))
    }

    fn fallback_description(&self, old: &str, new: &str, kind: ChangeKind) -> String {
        let generic = match kind {
            ChangeKind::Replace => "Replaced",
            ChangeKind::Insert => "Inserted",
        };
        let Some(client) = &self.fallback else {
            return generic.to_string();
        };

        let kind_word = match kind {
            ChangeKind::Replace => "replace",
            ChangeKind::Insert => "insert",
        };
        let prompt = format!(
            "Describe briefly what changed ({kind_word}). \
             Give 1 sentence, concrete (e.g. 'Count changed from 20 to 40').\n\
             Old: {}\nNew: {}",
            if old.is_empty() { "(empty)" } else { old },
            if new.is_empty() { "(empty)" } else { new },
        );

        match client.complete(SYSTEM_PROMPT, &prompt) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => generic.to_string(),
            Err(err) => {
                warn!(%err, "description fallback failed, using generic label");
                generic.to_string()
            }
        }
    }
}

impl ChangeDescriber for Describer {
    fn describe(&self, change: &Change) -> String {
        match change.kind {
            ChangeKind::Replace => {
                self.describe_replace(change.old_text.as_deref().unwrap_or(""), &change.new_text)
            }
            ChangeKind::Insert => self.describe_insert(&change.new_text),
        }
    }
}

/// Ordered heuristics, first hit wins. `None` means "consult the fallback".
fn heuristic_description(old: &str, new: &str, kind: ChangeKind) -> Option<String> {
    let (old_label, old_value) = labels::split_label_value(old);
    let (new_label, new_value) = labels::split_label_value(new);

    if let Some(key) = new_label.or(old_label).and_then(labels::label_key) {
        match kind {
            ChangeKind::Replace => {
                if labels::is_unknown_value(old_value)
                    && !labels::is_unknown_value(new_value)
                    && !new_value.is_empty()
                {
                    return Some(format!("Field {key} filled: unknown → {new_value}"));
                }
            }
            ChangeKind::Insert => {
                if !labels::is_unknown_value(new_value) && !new_value.is_empty() {
                    return Some(format!("New field {key}: {new_value}"));
                }
            }
        }
    }

    if let Some(message) = detect::contact_filled(old, new) {
        return Some(message);
    }
    if let Some((o, n)) = detect::number_change(old, new) {
        return Some(format!("Count changed: {o} → {n}"));
    }
    if let Some((o, n)) = detect::date_change(old, new) {
        return Some(format!("Date changed: {o} → {n}"));
    }

    None
}
