//! VDF value types.
//!
//! The text format only ever produces [`Value::Mapping`] and [`Value::String`].
//! The remaining variants come from the binary format, where each one has its
//! own tag byte. `Pointer` and `Color` share the `Int32` payload layout but are
//! kept as separate variants so a binary round-trip writes the same tag back.

use crate::mapper::{Document, MultiDocument};

/// A single value stored under a key. `M` is the mapping type used for nested
/// mappings, so a tree is homogeneous in its container type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<M = Document> {
    /// Nested key/value mapping (binary tag `0x00`).
    Mapping(M),
    /// Text string (binary tags `0x01` and `0x05`).
    String(String),
    /// Signed 32-bit integer (binary tag `0x02`).
    Int32(i32),
    /// 32-bit float (binary tag `0x03`).
    Float32(f32),
    /// Pointer-sized value (binary tag `0x04`).
    Pointer(i32),
    /// Packed RGBA color (binary tag `0x06`).
    Color(i32),
    /// Unsigned 64-bit integer (binary tag `0x07`).
    UInt64(u64),
    /// Signed 64-bit integer (binary tag `0x0A`).
    Int64(i64),
}

impl<M> Value<M> {
    /// Returns the string if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested mapping if this is a [`Value::Mapping`].
    pub fn as_mapping(&self) -> Option<&M> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut M> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Mapping(_) => "mapping",
            Value::String(_) => "string",
            Value::Int32(_) => "int32",
            Value::Float32(_) => "float32",
            Value::Pointer(_) => "pointer",
            Value::Color(_) => "color",
            Value::UInt64(_) => "uint64",
            Value::Int64(_) => "int64",
        }
    }
}

impl<M> From<&str> for Value<M> {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<M> From<String> for Value<M> {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<M> From<i32> for Value<M> {
    fn from(n: i32) -> Self {
        Value::Int32(n)
    }
}

impl<M> From<f32> for Value<M> {
    fn from(f: f32) -> Self {
        Value::Float32(f)
    }
}

impl<M> From<u64> for Value<M> {
    fn from(n: u64) -> Self {
        Value::UInt64(n)
    }
}

impl<M> From<i64> for Value<M> {
    fn from(n: i64) -> Self {
        Value::Int64(n)
    }
}

impl From<Document> for Value<Document> {
    fn from(doc: Document) -> Self {
        Value::Mapping(doc)
    }
}

impl From<MultiDocument> for Value<MultiDocument> {
    fn from(doc: MultiDocument) -> Self {
        Value::Mapping(doc)
    }
}
