//! Error types for VDF text, binary and VBKV encoding and decoding.

use thiserror::Error;

/// Broad classification of a [`VdfError`].
///
/// Lets callers tell a corrupted VBKV blob (checksum) apart from malformed
/// input without matching on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed the codec a value it cannot represent.
    Type,
    /// Malformed text or binary input.
    Format,
    /// VBKV checksum mismatch.
    Checksum,
    /// The caller-supplied reader or writer failed.
    Io,
}

/// Errors that can occur during VDF encoding or decoding.
#[derive(Error, Debug)]
pub enum VdfError {
    /// The text input was not valid VDF.
    /// `line` is the 1-based line number where the offending entry started.
    #[error("{source_name}:{line}: {message}: {text:?}")]
    Syntax {
        source_name: String,
        line: usize,
        message: &'static str,
        text: String,
    },

    /// A key or string in binary input had no terminating NUL.
    #[error("unterminated cstring (offset: {offset})")]
    UnterminatedString { offset: usize },

    /// A binary record started with a tag byte that is not a known data type.
    #[error("unknown data type at offset {offset}: 0x{tag:02x}")]
    UnknownType { tag: u8, offset: usize },

    /// A fixed-width binary payload ran past the end of the buffer.
    #[error("truncated {context} at offset {offset}")]
    Truncated { context: &'static str, offset: usize },

    /// Binary input ended early (unclosed mappings) or carried trailing bytes.
    #[error("binary VDF ended at offset {offset}, but length is {len}")]
    LengthMismatch { offset: usize, len: usize },

    /// VBKV input did not start with the `VBKV` magic.
    #[error("invalid header: expected VBKV, found {found:?}")]
    InvalidHeader { found: Vec<u8> },

    /// The stored VBKV CRC32 does not match the payload.
    #[error("invalid checksum: stored {stored:#010x}, computed {computed:#010x}")]
    InvalidChecksum { stored: u32, computed: u32 },

    /// A value cannot be represented in the target encoding.
    #[error("type error: {0}")]
    Type(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VdfError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VdfError::Syntax { .. }
            | VdfError::UnterminatedString { .. }
            | VdfError::UnknownType { .. }
            | VdfError::Truncated { .. }
            | VdfError::LengthMismatch { .. }
            | VdfError::InvalidHeader { .. } => ErrorKind::Format,
            VdfError::InvalidChecksum { .. } => ErrorKind::Checksum,
            VdfError::Type(_) => ErrorKind::Type,
            VdfError::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::Checksum`.
    pub fn is_checksum(&self) -> bool {
        self.kind() == ErrorKind::Checksum
    }
}

/// Convenience alias used throughout vdf-core.
pub type Result<T> = std::result::Result<T, VdfError>;
