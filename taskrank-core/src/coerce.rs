//! Lenient, fallible conversions over loosely-typed JSON values.
//!
//! Each helper answers "can this be read as X?" with an `Option` (or a small
//! enum for lists). Deciding on defaults and wording warnings is left to the
//! normalizer so every correction is reported in one place.

use serde_json::Value;

/// Short name of a JSON value's shape, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a raw value the way it should appear inside a warning.
/// Strings are shown without quotes, everything else as compact JSON.
pub fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Empty-ish values that count as "not provided".
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Integer reading: booleans count as 0/1, floats truncate toward zero,
/// strings must hold a plain (optionally signed) integer.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if n.as_u64().is_some() {
                Some(i64::MAX)
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Float reading. Non-finite results (`"inf"`, `"NaN"`) are rejected.
pub fn coerce_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

/// Identifier-like reading: strings as-is, scalars via their JSON text.
/// `null` and containers are not identifiers.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// How a dependency field was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCoercion {
    /// Falsy input; nothing to report.
    Empty,
    /// Already a list of strings.
    Strings(Vec<String>),
    /// Comma-separated string, split and trimmed.
    Split(Vec<String>),
    /// Another container (non-string list items, object keys) cast to strings.
    Cast(Vec<String>),
    /// Scalar that cannot be viewed as a list.
    Invalid,
}

pub fn coerce_list(value: &Value) -> ListCoercion {
    if is_falsy(value) {
        return ListCoercion::Empty;
    }

    match value {
        Value::Array(items) => {
            if items.iter().all(Value::is_string) {
                ListCoercion::Strings(items.iter().map(display_raw).collect())
            } else {
                ListCoercion::Cast(items.iter().map(display_raw).collect())
            }
        }
        Value::String(s) => ListCoercion::Split(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Object(map) => ListCoercion::Cast(map.keys().cloned().collect()),
        _ => ListCoercion::Invalid,
    }
}
