//! # vdf-core
//!
//! Pure-Rust encoder and decoder for Valve's **VDF / KeyValues** format.
//!
//! Three encodings of the same tree shape are supported:
//!
//! - **Text**: the brace-delimited format of Steam manifests and config files
//! - **Binary**: tagged records with typed numeric payloads (`appinfo`,
//!   `shortcuts.vdf`), in the standard (`0x08` END) and alt (`0x0B` END) variants
//! - **VBKV**: binary VDF framed with a `VBKV` magic and a CRC32
//!
//! ## Quick start
//!
//! ```rust
//! use vdf_core::{dumps, loads, Document, DumpOptions, ParseOptions};
//!
//! let text = "\"AppState\"\n{\n\t\"appid\" \"400\"\n\t\"name\" \"Portal\"\n}\n";
//! let doc: Document = loads(text, &ParseOptions::default()).unwrap();
//! let app = doc.get_mapping("AppState").unwrap();
//! assert_eq!(app.get_str("name"), Some("Portal"));
//!
//! // Document → text (roundtrip)
//! assert_eq!(dumps(&doc, &DumpOptions::pretty()), text);
//! ```
//!
//! Every reader is generic over the output container ([`Mapper`]). Use
//! [`Document`] for ordinary lookups or [`MultiDocument`] to keep duplicate
//! keys exactly as they appear in the input.
//!
//! Readers track nesting with an explicit stack. Writers recurse, so writing a
//! tree nested thousands of levels deep can exhaust the call stack.
//!
//! ## Modules
//!
//! - [`decoder`]: VDF text → tree
//! - [`encoder`]: tree → VDF text
//! - [`binary_decoder`]: binary VDF → tree
//! - [`binary_encoder`]: tree → binary VDF
//! - [`vbkv`]: CRC32-framed binary VDF
//! - [`escape`]: backslash escape table
//! - [`mapper`]: `Mapper` trait, `Document`, `MultiDocument`
//! - [`json`]: serde serialization and JSON → `Document`
//! - [`error`]: error types for parse/encode failures

pub mod binary_decoder;
pub mod binary_encoder;
mod builder;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod json;
pub mod mapper;
pub mod options;
pub mod types;
pub mod vbkv;

pub use binary_decoder::binary_parse;
pub use binary_encoder::binary_dumps;
pub use decoder::{loads, parse};
pub use encoder::{dump, dumps};
pub use error::{ErrorKind, Result, VdfError};
pub use escape::{escape, unescape};
pub use json::from_json;
pub use mapper::{Document, Mapper, MultiDocument};
pub use options::{BinaryOptions, DumpOptions, ParseOptions};
pub use types::Value;
pub use vbkv::{vbkv_dumps, vbkv_loads};
