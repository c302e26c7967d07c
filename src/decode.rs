//! Extraction of entity names from repaired pseudo-JSON cells.

use itertools::Itertools;
use serde_json::Value;

use crate::literal::normalize_literal;

/// Pull the values of `attribute` out of a pseudo-JSON list-of-dicts cell.
///
/// Names are returned in first-seen order, deduplicated, with empty strings
/// dropped. A lone dict is treated as a one-element list. Any decoding
/// failure (no usable structure, wrong top-level shape, missing or
/// non-string attribute) degrades to an empty list so row processing can
/// continue.
pub fn decode_attribute(raw: &str, attribute: &str) -> Vec<String> {
    let Some(normalized) = normalize_literal(raw) else {
        return Vec::new();
    };
    let parsed: Value = match serde_json::from_str(&normalized) {
        Ok(value) => value,
        Err(_) => return Vec::new(),
    };
    let elements = match parsed {
        Value::Array(items) => items,
        lone @ Value::Object(_) => vec![lone],
        _ => return Vec::new(),
    };
    elements
        .iter()
        .filter_map(|element| element.get(attribute))
        .filter_map(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unique()
        .collect()
}

/// Shorthand for the dataset's convention of naming entities via `"name"`.
pub fn decode_names(raw: &str) -> Vec<String> {
    decode_attribute(raw, "name")
}
