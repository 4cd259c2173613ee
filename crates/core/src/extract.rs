//! Tolerant field extraction for upstream JSON.
//!
//! NASA APIs spell the same logical field several ways and change shape
//! without notice. Each logical field is read through an ordered list of
//! [`Extractor`]s; the first one that yields a non-empty string wins.

use serde_json::Value;

/// Reads one candidate value out of a JSON record.
pub type Extractor = fn(&Value) -> Option<String>;

/// Evaluates `extractors` in order and returns the first non-empty hit.
pub fn first_match(value: &Value, extractors: &[Extractor]) -> Option<String> {
    extractors.iter().find_map(|extract| extract(value))
}

/// First non-empty string (or number rendered as string) under any of `keys`.
pub fn first_key(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| value.get(*key).and_then(as_text))
}

/// Same as [`first_key`] but walks JSON pointers such as `/projects/0/short_name`.
pub fn first_pointer(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(as_text))
}

pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Array at `pointer`, or an empty slice when missing or not an array.
pub fn array_at<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
