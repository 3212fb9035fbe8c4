//! Payload sanitization for destinations that accept only scalar values.

use serde_json::{Map, Value};

/// Flatten a parameter object to scalars.
///
/// Null values are dropped. Arrays and objects are encoded as JSON strings.
/// Strings, numbers and booleans pass through unchanged.
pub fn sanitize(params: &Map<String, Value>) -> Map<String, Value> {
    params
        .iter()
        .filter_map(|(key, value)| sanitize_value(value).map(|v| (key.clone(), v)))
        .collect()
}

fn sanitize_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Some(value.clone()),
        Value::Array(_) | Value::Object(_) => Some(Value::String(value.to_string())),
    }
}
