//! VDF text encoder. Writes a [`Mapper`] tree as KeyValues text.
//!
//! Every key and string value is quoted. Scalars are written as
//! `"key" "value"` on one line; nested mappings as
//!
//! ```text
//! "key"
//! {
//!     "child" "value"
//! }
//! ```
//!
//! With [`DumpOptions::pretty`] each nesting level is indented by one tab.
//! The binary-only numeric kinds are written as their decimal text, which
//! reads back as a string.

use std::io::Write;

use crate::error::Result;
use crate::escape::escape;
use crate::mapper::Mapper;
use crate::options::DumpOptions;
use crate::types::Value;

/// Serialize a tree to VDF text.
///
/// ```
/// use vdf_core::{dumps, Document, DumpOptions};
///
/// let mut doc = Document::new();
/// doc.insert("key1", "value1");
/// doc.insert("key2", "value2");
/// assert_eq!(dumps(&doc, &DumpOptions::default()), "\"key1\" \"value1\"\n\"key2\" \"value2\"\n");
/// ```
pub fn dumps<M: Mapper>(doc: &M, options: &DumpOptions) -> String {
    let mut out = String::new();
    encode_mapping(doc, 0, options, &mut out);
    tracing::debug!(entries = doc.len(), bytes = out.len(), "encoded VDF text");
    out
}

/// Serialize a tree to VDF text and write it to `sink`.
pub fn dump<M: Mapper, W: Write>(doc: &M, mut sink: W, options: &DumpOptions) -> Result<()> {
    let text = dumps(doc, options);
    sink.write_all(text.as_bytes())?;
    Ok(())
}

/// Emit all entries of one mapping at the given nesting level.
fn encode_mapping<M: Mapper>(map: &M, level: usize, options: &DumpOptions, out: &mut String) {
    let indent = if options.pretty {
        "\t".repeat(level)
    } else {
        String::new()
    };

    for (key, value) in map.iter() {
        let key = encode_text(key, options);
        match value {
            Value::Mapping(child) => {
                out.push_str(&format!("{indent}\"{key}\"\n{indent}{{\n"));
                encode_mapping(child, level + 1, options, out);
                out.push_str(&format!("{indent}}}\n"));
            }
            scalar => {
                let value = encode_scalar(scalar, options);
                out.push_str(&format!("{indent}\"{key}\" \"{value}\"\n"));
            }
        }
    }
}

/// Text form of a non-mapping value.
fn encode_scalar<M>(value: &Value<M>, options: &DumpOptions) -> String {
    match value {
        Value::String(s) => encode_text(s, options),
        Value::Int32(n) | Value::Pointer(n) | Value::Color(n) => n.to_string(),
        Value::Float32(f) => format!("{f:?}"),
        Value::UInt64(n) => n.to_string(),
        Value::Int64(n) => n.to_string(),
        Value::Mapping(_) => String::new(),
    }
}

fn encode_text(s: &str, options: &DumpOptions) -> String {
    if options.escaped {
        escape(s)
    } else {
        s.to_string()
    }
}
