//! Response normalization
//!
//! Spotlight serializes its XML model to JSON: attribute names carry an
//! `@` marker and every scalar arrives as a string. [`clean`] walks the
//! parsed tree and turns it into a uniformly typed value:
//! - `@` markers are stripped from keys
//! - null entries are dropped
//! - numeric strings become JSON numbers (integer first, then float)
//! - maps stay maps and sequences stay sequences, in input order

use serde_json::{Map, Number, Value};

/// Keys whose values are identifiers and never numerically coerced
pub const EXEMPT_FIELDS: [&str; 2] = ["surfaceForm", "name"];

/// Normalize a parsed Spotlight response node.
pub fn clean(node: &Value) -> Value {
    match node {
        Value::Object(map) => Value::Object(clean_map(map)),
        Value::Array(items) => match clean_sequence(items) {
            Some(cleaned) => Value::Array(cleaned),
            None => convert_number(node),
        },
        Value::Null => Value::Null,
        scalar => convert_number(scalar),
    }
}

/// Normalize every entry of a mapping, preserving key order.
pub fn clean_map(map: &Map<String, Value>) -> Map<String, Value> {
    let mut cleaned = Map::with_capacity(map.len());
    for (key, value) in map {
        if value.is_null() {
            continue;
        }

        let key = key.replace('@', "");
        let structural = match value {
            Value::String(_) | Value::Bool(_) => None,
            Value::Array(items) => clean_sequence(items).map(Value::Array),
            Value::Object(inner) => Some(Value::Object(clean_map(inner))),
            _ => None,
        };

        let cleaned_value = match structural {
            Some(value) => value,
            None if is_exempt(&key) => value.clone(),
            None => convert_number(value),
        };
        cleaned.insert(key, cleaned_value);
    }
    cleaned
}

/// Clean a sequence element-wise.
///
/// Only sequences of mappings are structural. Anything else (scalars,
/// nulls or nested sequences as elements) yields `None` and the whole
/// sequence is treated as a leaf, which is how Spotlight's stray
/// footnote lists end up as strings.
fn clean_sequence(items: &[Value]) -> Option<Vec<Value>> {
    items
        .iter()
        .map(|item| item.as_object().map(|map| Value::Object(clean_map(map))))
        .collect()
}

fn is_exempt(key: &str) -> bool {
    EXEMPT_FIELDS.contains(&key)
}

/// Try to turn a leaf into an integer or a float.
///
/// Booleans are returned untouched. Sequences are rendered to their JSON
/// text first. Strings are parsed as an integer, then as a float, and are
/// returned unchanged when neither parse succeeds. Numbers pass through.
pub fn convert_number(value: &Value) -> Value {
    let text = match value {
        Value::String(text) => text.as_str(),
        Value::Array(_) => {
            let rendered = value.to_string();
            return parse_number(&rendered).unwrap_or(Value::String(rendered));
        }
        other => return other.clone(),
    };

    parse_number(text).unwrap_or_else(|| value.clone())
}

fn parse_number(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    if let Ok(uint) = trimmed.parse::<u64>() {
        return Some(Value::Number(uint.into()));
    }
    // Integers wider than 64 bits would lose digits as floats
    if looks_like_integer(trimmed) {
        return None;
    }
    // Non-finite floats have no JSON representation and stay strings
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn looks_like_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Tests
// ============================================================================
