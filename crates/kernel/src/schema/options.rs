//! Select option coercion.

use std::collections::HashSet;

use formsmith_sdk::limits::{MAX_OPTION_COUNT, MAX_OPTION_LEN};
use serde_json::Value;

use super::truncate_chars;

/// Normalize a raw options payload.
///
/// Accepts either a JSON array or a single string split on newlines and
/// commas. Any other shape yields no options. Array elements that are not
/// strings are stringified.
pub fn coerce_options(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => coerce_option_list(items.iter().map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })),
        Value::String(text) => coerce_option_list(text.split(['\n', ','])),
        _ => Vec::new(),
    }
}

/// Trim, drop blanks, cap length, and de-duplicate case-insensitively.
///
/// The first-seen casing and order win. Candidates beyond
/// [`MAX_OPTION_COUNT`] are dropped without error.
pub fn coerce_option_list<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();

    for candidate in candidates {
        let trimmed = candidate.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        let option = truncate_chars(trimmed, MAX_OPTION_LEN);
        if !seen.insert(option.to_lowercase()) {
            continue;
        }
        cleaned.push(option);
        if cleaned.len() >= MAX_OPTION_COUNT {
            break;
        }
    }

    cleaned
}
