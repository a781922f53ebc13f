//! Binary VDF encoder, the inverse of [`crate::binary_decoder`].
//!
//! Each entry is written as `[tag][key\0][payload]`; every mapping, the root
//! included, is closed with the configured END tag. The one exception is an
//! empty root, which encodes to zero bytes so that it reads back from an
//! empty buffer.

use crate::binary_decoder::{
    BIN_COLOR, BIN_FLOAT32, BIN_INT32, BIN_INT64, BIN_NONE, BIN_POINTER, BIN_STRING, BIN_UINT64,
};
use crate::error::{Result, VdfError};
use crate::mapper::Mapper;
use crate::options::end_tag;
use crate::types::Value;

/// Encode a tree as binary VDF, closing mappings with `0x0B` when
/// `alt_format` is set and `0x08` otherwise.
///
/// Keys and strings are written NUL-terminated, so a key or string value
/// containing `\0` is rejected with [`VdfError::Type`].
///
/// ```
/// use vdf_core::{binary_dumps, Document};
///
/// let mut doc = Document::new();
/// doc.insert("a", "b");
/// assert_eq!(binary_dumps(&doc, false).unwrap(), b"\x01a\x00b\x00\x08");
/// assert_eq!(binary_dumps(&doc, true).unwrap(), b"\x01a\x00b\x00\x0b");
/// ```
pub fn binary_dumps<M: Mapper>(doc: &M, alt_format: bool) -> Result<Vec<u8>> {
    if doc.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = Writer::new(end_tag(alt_format));
    writer.write_mapping(doc)?;
    let bytes = writer.into_bytes();
    tracing::debug!(
        entries = doc.len(),
        bytes = bytes.len(),
        alt_format,
        "encoded binary VDF"
    );
    Ok(bytes)
}

/// Output buffer plus the END tag in use.
struct Writer {
    buf: Vec<u8>,
    end_tag: u8,
}

impl Writer {
    fn new(end_tag: u8) -> Self {
        Self {
            buf: Vec::new(),
            end_tag,
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Emit every entry of `map`, then the END tag.
    fn write_mapping<M: Mapper>(&mut self, map: &M) -> Result<()> {
        for (key, value) in map.iter() {
            match value {
                Value::Mapping(child) => {
                    self.write_header(BIN_NONE, key)?;
                    self.write_mapping(child)?;
                }
                Value::String(s) => {
                    self.write_header(BIN_STRING, key)?;
                    self.write_cstring(s, value.type_name())?;
                }
                Value::Int32(n) => {
                    self.write_header(BIN_INT32, key)?;
                    self.buf.extend_from_slice(&n.to_le_bytes());
                }
                Value::Pointer(n) => {
                    self.write_header(BIN_POINTER, key)?;
                    self.buf.extend_from_slice(&n.to_le_bytes());
                }
                Value::Color(n) => {
                    self.write_header(BIN_COLOR, key)?;
                    self.buf.extend_from_slice(&n.to_le_bytes());
                }
                Value::Float32(f) => {
                    self.write_header(BIN_FLOAT32, key)?;
                    self.buf.extend_from_slice(&f.to_le_bytes());
                }
                Value::UInt64(n) => {
                    self.write_header(BIN_UINT64, key)?;
                    self.buf.extend_from_slice(&n.to_le_bytes());
                }
                Value::Int64(n) => {
                    self.write_header(BIN_INT64, key)?;
                    self.buf.extend_from_slice(&n.to_le_bytes());
                }
            }
        }
        self.buf.push(self.end_tag);
        Ok(())
    }

    fn write_header(&mut self, tag: u8, key: &str) -> Result<()> {
        self.buf.push(tag);
        self.write_cstring(key, "key")
    }

    fn write_cstring(&mut self, s: &str, what: &str) -> Result<()> {
        if s.contains('\0') {
            return Err(VdfError::Type(format!(
                "{what} {s:?} contains a NUL byte and cannot be NUL-terminated"
            )));
        }
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        Ok(())
    }
}
