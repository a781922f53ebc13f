//! VBKV framing: binary VDF with a magic header and CRC32.
//!
//! ```text
//! [magic:4 = "VBKV"][crc32:4 LE][payload:N]
//! ```
//!
//! The payload is binary VDF using the alt END tag (`0x0B`). The CRC32 covers
//! the payload only. Bare binary VDF carries no length or checksum, so this
//! framing is what Steam uses when it embeds KeyValues as an opaque blob.

use crate::binary_decoder::binary_parse;
use crate::binary_encoder::binary_dumps;
use crate::error::{Result, VdfError};
use crate::mapper::Mapper;
use crate::options::BinaryOptions;

pub const VBKV_MAGIC: &[u8; 4] = b"VBKV";

/// Magic plus checksum.
const HEADER_SIZE: usize = 8;

/// Decode a VBKV blob.
///
/// Fails with [`VdfError::InvalidHeader`] if the magic is missing and with
/// [`VdfError::InvalidChecksum`] if the payload does not match the stored
/// CRC32; use [`VdfError::is_checksum`] to tell the two apart.
pub fn vbkv_loads<M: Mapper>(data: &[u8], merge_duplicate_keys: bool) -> Result<M> {
    if data.len() < HEADER_SIZE || &data[..4] != VBKV_MAGIC {
        return Err(VdfError::InvalidHeader {
            found: data[..data.len().min(4)].to_vec(),
        });
    }

    let stored = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let payload = &data[HEADER_SIZE..];
    let computed = crc32fast::hash(payload);
    if stored != computed {
        tracing::warn!(stored, computed, "VBKV checksum mismatch");
        return Err(VdfError::InvalidChecksum { stored, computed });
    }

    let options = BinaryOptions {
        merge_duplicate_keys,
        alt_format: true,
    };
    binary_parse(payload, &options)
}

/// Encode a tree as a VBKV blob.
///
/// ```
/// use vdf_core::{vbkv_dumps, Document};
///
/// assert_eq!(vbkv_dumps(&Document::new()).unwrap(), b"VBKV\x00\x00\x00\x00");
/// ```
pub fn vbkv_dumps<M: Mapper>(doc: &M) -> Result<Vec<u8>> {
    let payload = binary_dumps(doc, true)?;
    let checksum = crc32fast::hash(&payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(VBKV_MAGIC);
    out.extend_from_slice(&checksum.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}
