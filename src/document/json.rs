//! Typed accessors over dynamic JSON values.
//!
//! Documents are arbitrary `serde_json::Value` trees; these helpers pull out
//! a field of a given type or return `None`, never panicking on shape.

use serde_json::{Map, Value};

/// Integer field, `None` if missing or not an integer.
pub fn json_i64(object: &Map<String, Value>, field: &str) -> Option<i64> {
    object.get(field).and_then(Value::as_i64)
}

/// Non-blank string field.
pub fn json_str<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Nested object field.
pub fn json_object<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Map<String, Value>> {
    object.get(field).and_then(Value::as_object)
}
