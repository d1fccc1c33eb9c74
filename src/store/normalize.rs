//! Flattening of entries into plain text tokens

use crate::models::{Entry, FieldValue};

/// Stringified leaves that carry no content
const EMPTY_MARKERS: &[&str] = &["", "null", "undefined"];

/// Flatten an entry into its non-empty leaf strings
///
/// Nested lists and maps are descended recursively. Top-level fields named in
/// `excluded_fields` are skipped. Every surviving leaf is trimmed; leaves that
/// end up empty, `null` or `undefined` are dropped.
pub fn flatten(entry: &Entry, excluded_fields: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for (field, value) in entry.fields() {
        if excluded_fields.iter().any(|f| f == field) {
            continue;
        }
        flatten_value(value, &mut out);
    }
    out
}

/// Flatten a single value, appending surviving leaves to `out`
pub fn flatten_value(value: &FieldValue, out: &mut Vec<String>) {
    match value {
        FieldValue::List(items) => {
            for item in items {
                flatten_value(item, out);
            }
        }
        FieldValue::Map(map) => {
            for item in map.values() {
                flatten_value(item, out);
            }
        }
        leaf => {
            if let Some(text) = leaf.leaf_text() {
                let trimmed = text.trim();
                if !EMPTY_MARKERS.contains(&trimmed) {
                    out.push(trimmed.to_string());
                }
            }
        }
    }
}

/// Non-empty leaf strings of one field value, in order
pub fn value_leaves(value: &FieldValue) -> Vec<String> {
    let mut leaves = Vec::new();
    flatten_value(value, &mut leaves);
    leaves
}

/// Lowercased free-text blob of an entry
pub fn content_blob(entry: &Entry, excluded_fields: &[String]) -> String {
    flatten(entry, excluded_fields).join(" ").to_lowercase()
}
