//! Helpers for shaping loosely-typed model output.
//!
//! Models drift from the requested schema: lists contain numbers or nulls,
//! floats arrive as strings. These helpers take what is usable and drop the
//! rest instead of failing the whole reply.

use serde_json::Value as JsonValue;

/// String elements of a JSON array. Anything else yields an empty list.
#[must_use]
pub fn string_list(value: Option<&JsonValue>) -> Vec<String> {
    match value {
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Number of whitespace-delimited words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keeps entries with at least `min_words` words. Entries are never altered.
#[must_use]
pub fn with_min_words(items: Vec<String>, min_words: usize) -> Vec<String> {
    items
        .into_iter()
        .filter(|item| word_count(item) >= min_words)
        .collect()
}

/// A float, or a string that parses as one.
#[must_use]
pub fn loose_f64(value: Option<&JsonValue>) -> Option<f64> {
    let parsed = match value? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}
