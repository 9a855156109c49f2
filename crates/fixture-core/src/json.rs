//! JSON rendering of populated values.
//!
//! Conversion rules:
//! - Integers and floats become JSON numbers (non-finite floats become `null`)
//! - Decimals become strings to preserve precision
//! - Bytes are base64 encoded
//! - Temporal values use ISO 8601
//! - Maps with string keys become JSON objects, otherwise arrays of `[key, value]` pairs
//! - Objects become JSON objects; enums become their variant name

use crate::values::Value;
use base64::Engine;
use serde_json::json;

/// Wrapper for JSON values.
#[derive(Debug, Clone)]
pub struct JsonValue(pub serde_json::Value);

impl JsonValue {
    /// Get the inner JSON value.
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the inner JSON value.
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        JsonValue(to_json(value))
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        JsonValue::from(&value)
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(*b),
        Value::Char(c) => json!(c.to_string()),
        Value::Byte(i) => json!(*i),
        Value::Short(i) => json!(*i),
        Value::Int(i) => json!(*i),
        Value::Long(i) => json!(*i),
        // json! maps NaN and infinities to null
        Value::Float(f) => json!(*f),
        Value::Double(f) => json!(*f),
        Value::Decimal(d) => json!(d.to_string()),
        Value::String(s) => json!(s),
        Value::Bytes(b) => json!(base64::engine::general_purpose::STANDARD.encode(b)),
        Value::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
        Value::Time(t) => json!(t.format("%H:%M:%S").to_string()),
        Value::DateTime(dt) => json!(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        Value::ZonedDateTime(dt) => json!(dt.to_rfc3339()),
        Value::Uuid(u) => json!(u.to_string()),
        Value::Url(u) => json!(u.as_str()),
        Value::List(items) | Value::Set(items) | Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect())
        }
        Value::Map(entries) => {
            if entries.iter().all(|(k, _)| matches!(k, Value::String(_))) {
                let obj: serde_json::Map<String, serde_json::Value> = entries
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), to_json(v))))
                    .collect();
                serde_json::Value::Object(obj)
            } else {
                serde_json::Value::Array(
                    entries
                        .iter()
                        .map(|(k, v)| json!([to_json(k), to_json(v)]))
                        .collect(),
                )
            }
        }
        Value::Enum { variant, .. } => json!(variant),
        Value::Object(obj) => {
            let fields: serde_json::Map<String, serde_json::Value> = obj
                .fields
                .iter()
                .map(|(name, v)| (name.clone(), to_json(v)))
                .collect();
            serde_json::Value::Object(fields)
        }
    }
}
