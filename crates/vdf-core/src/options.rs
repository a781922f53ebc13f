//! Per-call options for the readers and writers.

use crate::binary_decoder::{BIN_END, BIN_END_ALT};

/// Options for [`crate::parse`] and [`crate::loads`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Union a repeated mapping key into the existing mapping instead of
    /// replacing it. Default `true`.
    pub merge_duplicate_keys: bool,
    /// Decode backslash escapes in keys and values. Default `true`.
    pub escaped: bool,
    /// Name reported in syntax errors, e.g. a file path. `<input>` if unset.
    pub source_name: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            merge_duplicate_keys: true,
            escaped: true,
            source_name: None,
        }
    }
}

impl ParseOptions {
    pub fn with_merge_duplicate_keys(mut self, merge: bool) -> Self {
        self.merge_duplicate_keys = merge;
        self
    }

    pub fn with_escaped(mut self, escaped: bool) -> Self {
        self.escaped = escaped;
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub(crate) fn source_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or("<input>")
    }
}

/// Options for [`crate::dumps`] and [`crate::dump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Indent nested mappings with one tab per level. Default `false`.
    pub pretty: bool,
    /// Escape special characters in keys and values. Default `true`.
    pub escaped: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            escaped: true,
        }
    }
}

impl DumpOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_escaped(mut self, escaped: bool) -> Self {
        self.escaped = escaped;
        self
    }
}

/// Options for [`crate::binary_parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOptions {
    /// Same meaning as [`ParseOptions::merge_duplicate_keys`]. Default `true`.
    pub merge_duplicate_keys: bool,
    /// Use `0x0B` instead of `0x08` as the end-of-mapping tag. Default `false`.
    pub alt_format: bool,
}

impl Default for BinaryOptions {
    fn default() -> Self {
        Self {
            merge_duplicate_keys: true,
            alt_format: false,
        }
    }
}

impl BinaryOptions {
    pub fn with_merge_duplicate_keys(mut self, merge: bool) -> Self {
        self.merge_duplicate_keys = merge;
        self
    }

    pub fn with_alt_format(mut self, alt: bool) -> Self {
        self.alt_format = alt;
        self
    }

    /// The tag byte that closes a mapping in this mode.
    pub fn end_tag(&self) -> u8 {
        end_tag(self.alt_format)
    }
}

pub(crate) fn end_tag(alt_format: bool) -> u8 {
    if alt_format {
        BIN_END_ALT
    } else {
        BIN_END
    }
}
