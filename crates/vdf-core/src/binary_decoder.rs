//! Binary VDF decoder.
//!
//! Wire format: a flat run of records per mapping level, each
//!
//! ```text
//! [tag:1][key:NUL-terminated UTF-8][payload]
//! ```
//!
//! closed by an END tag. A nested mapping record (`0x00`) has no payload; its
//! entries follow immediately, up to the matching END. All multi-byte numbers
//! are little-endian.
//!
//! Two END tags exist in the wild: `0x08` in most files and `0x0B` in the
//! "alt" variant used inside VBKV blobs. The caller picks one; the other is
//! then an unknown tag.

use crate::builder::TreeBuilder;
use crate::error::{Result, VdfError};
use crate::mapper::Mapper;
use crate::options::BinaryOptions;
use crate::types::Value;

pub const BIN_NONE: u8 = 0x00;
pub const BIN_STRING: u8 = 0x01;
pub const BIN_INT32: u8 = 0x02;
pub const BIN_FLOAT32: u8 = 0x03;
pub const BIN_POINTER: u8 = 0x04;
pub const BIN_WIDESTRING: u8 = 0x05;
pub const BIN_COLOR: u8 = 0x06;
pub const BIN_UINT64: u8 = 0x07;
pub const BIN_END: u8 = 0x08;
pub const BIN_INT64: u8 = 0x0A;
pub const BIN_END_ALT: u8 = 0x0B;

/// Decode binary VDF.
///
/// The whole buffer must be consumed: trailing bytes after the root END, or
/// running out of input with mappings still open, is an error. An empty
/// buffer decodes to an empty tree.
///
/// ```
/// use vdf_core::{binary_parse, BinaryOptions, Document};
///
/// let doc: Document = binary_parse(b"\x01a\x00b\x00\x08", &BinaryOptions::default()).unwrap();
/// assert_eq!(doc.get_str("a"), Some("b"));
/// ```
pub fn binary_parse<M: Mapper>(data: &[u8], options: &BinaryOptions) -> Result<M> {
    let end_tag = options.end_tag();
    let mut reader = Reader::new(data);
    let mut tree = TreeBuilder::<M>::new(options.merge_duplicate_keys);

    while !reader.is_empty() {
        let tag_offset = reader.position();
        let tag = reader.read_byte("tag")?;

        if tag == end_tag {
            if tree.close() {
                continue;
            }
            break;
        }

        let Some(kind) = RecordKind::from_tag(tag) else {
            return Err(VdfError::UnknownType {
                tag,
                offset: tag_offset,
            });
        };

        let key = reader.read_cstring()?;
        match kind {
            RecordKind::Mapping => tree.open(key),
            RecordKind::String => {
                let value = reader.read_cstring()?;
                tree.insert(key, Value::String(value));
            }
            RecordKind::WideString => {
                let value = reader.read_wide_cstring()?;
                tree.insert(key, Value::String(value));
            }
            RecordKind::Int32 => tree.insert(key, Value::Int32(reader.read_i32("int32")?)),
            RecordKind::Pointer => tree.insert(key, Value::Pointer(reader.read_i32("pointer")?)),
            RecordKind::Color => tree.insert(key, Value::Color(reader.read_i32("color")?)),
            RecordKind::Float32 => tree.insert(key, Value::Float32(reader.read_f32("float32")?)),
            RecordKind::UInt64 => tree.insert(key, Value::UInt64(reader.read_u64("uint64")?)),
            RecordKind::Int64 => tree.insert(key, Value::Int64(reader.read_i64("int64")?)),
        }
    }

    if !reader.is_empty() || tree.depth() != 1 {
        return Err(VdfError::LengthMismatch {
            offset: reader.position(),
            len: data.len(),
        });
    }

    let doc = tree.finish();
    tracing::debug!(
        bytes = data.len(),
        entries = doc.len(),
        alt_format = options.alt_format,
        "parsed binary VDF"
    );
    Ok(doc)
}

/// Record types that carry a key. END tags are handled separately.
#[derive(Debug, Clone, Copy)]
enum RecordKind {
    Mapping,
    String,
    Int32,
    Float32,
    Pointer,
    WideString,
    Color,
    UInt64,
    Int64,
}

impl RecordKind {
    fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            BIN_NONE => RecordKind::Mapping,
            BIN_STRING => RecordKind::String,
            BIN_INT32 => RecordKind::Int32,
            BIN_FLOAT32 => RecordKind::Float32,
            BIN_POINTER => RecordKind::Pointer,
            BIN_WIDESTRING => RecordKind::WideString,
            BIN_COLOR => RecordKind::Color,
            BIN_UINT64 => RecordKind::UInt64,
            BIN_INT64 => RecordKind::Int64,
            _ => return None,
        })
    }
}

/// Bounds-checked cursor over the input buffer.
#[derive(Debug, Clone)]
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn read_byte(&mut self, context: &'static str) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or(VdfError::Truncated {
            context,
            offset: self.pos,
        })?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + N)
            .ok_or(VdfError::Truncated {
                context,
                offset: self.pos,
            })?;
        self.pos += N;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_i32(&mut self, context: &'static str) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array(context)?))
    }

    fn read_f32(&mut self, context: &'static str) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array(context)?))
    }

    fn read_u64(&mut self, context: &'static str) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array(context)?))
    }

    fn read_i64(&mut self, context: &'static str) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array(context)?))
    }

    /// Read a NUL-terminated UTF-8 string. Invalid sequences become U+FFFD.
    fn read_cstring(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.data[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(VdfError::UnterminatedString { offset: start })?;
        let value = String::from_utf8_lossy(&self.data[start..start + len]).into_owned();
        self.pos = start + len + 1;
        Ok(value)
    }

    /// Read a UTF-16LE string terminated by a zero code unit.
    fn read_wide_cstring(&mut self) -> Result<String> {
        let start = self.pos;
        let mut units = Vec::new();
        let mut i = start;
        loop {
            let Some(pair) = self.data.get(i..i + 2) else {
                return Err(VdfError::UnterminatedString { offset: start });
            };
            let unit = u16::from_le_bytes([pair[0], pair[1]]);
            i += 2;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        self.pos = i;

        // A leading byte-order mark is not part of the value.
        let units = match units.first() {
            Some(0xFEFF) => &units[1..],
            _ => &units[..],
        };
        Ok(char::decode_utf16(units.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }
}
