//! JSON bridge.
//!
//! Trees serialize with `serde` as JSON objects in insertion order (with
//! `serde_json`'s `preserve_order` feature). A [`MultiDocument`] emits a
//! repeated key once per occurrence. Numeric kinds become JSON numbers; the
//! pointer/color distinction is not representable in JSON and is lost.
//!
//! [`from_json`] goes the other way for building documents from JSON input.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number};

use crate::error::{Result, VdfError};
use crate::mapper::{Document, MultiDocument};
use crate::types::Value;

impl<M: Serialize> Serialize for Value<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Mapping(m) => m.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Int32(n) | Value::Pointer(n) | Value::Color(n) => serializer.serialize_i32(*n),
            Value::Float32(f) => serializer.serialize_f32(*f),
            Value::UInt64(n) => serializer.serialize_u64(*n),
            Value::Int64(n) => serializer.serialize_i64(*n),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for MultiDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Build a [`Document`] from a JSON object.
///
/// Strings and nested objects map directly. Integers become `Int32` when they
/// fit, then `Int64`, then `UInt64`; other numbers become `Float32`.
/// Booleans, nulls and arrays have no VDF form and are rejected.
///
/// ```
/// use vdf_core::{from_json, Value};
///
/// let doc = from_json(&serde_json::json!({"name": "Portal", "appid": 400})).unwrap();
/// assert_eq!(doc.get_str("name"), Some("Portal"));
/// assert_eq!(doc.get("appid"), Some(&Value::Int32(400)));
/// ```
pub fn from_json(json: &serde_json::Value) -> Result<Document> {
    match json {
        serde_json::Value::Object(map) => object_to_document(map, "$"),
        other => Err(VdfError::Type(format!(
            "expected a JSON object at the top level, got {}",
            json_type_name(other)
        ))),
    }
}

fn object_to_document(map: &Map<String, serde_json::Value>, path: &str) -> Result<Document> {
    let mut doc = Document::with_capacity(map.len());
    for (key, value) in map {
        let path = format!("{path}.{key}");
        let value = match value {
            serde_json::Value::Object(child) => Value::Mapping(object_to_document(child, &path)?),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Number(n) => number_to_value(n),
            other => {
                return Err(VdfError::Type(format!(
                    "{path}: JSON {} has no VDF representation",
                    json_type_name(other)
                )))
            }
        };
        doc.insert(key.clone(), value);
    }
    Ok(doc)
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        return match i32::try_from(i) {
            Ok(small) => Value::Int32(small),
            Err(_) => Value::Int64(i),
        };
    }
    if let Some(u) = n.as_u64() {
        return Value::UInt64(u);
    }
    Value::Float32(n.as_f64().unwrap_or_default() as f32)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
