//! VDF text decoder. Converts KeyValues text into a [`Mapper`] tree.
//!
//! The reader is line oriented, the way Valve's own tools read these files:
//!
//! - `"key" "value"` or `key value` stores a string
//! - `"key"` alone on a line opens a nested mapping; the next content line
//!   must start with `{`
//! - a line starting with `}` closes the innermost mapping
//! - blank lines and lines starting with `/` are skipped; anything after a
//!   complete key/value pair on the same line is ignored (trailing comments)
//! - a quoted key or value may span several physical lines
//!
//! # Key design decisions
//!
//! - **One pair per line**: each content line is matched once against the
//!   key/value grammar. If the match fails, or a quoted value has no closing
//!   quote yet, the next physical line is appended (newline included) and the
//!   match is retried. This is how multi-line strings are read.
//! - **Hand-rolled matcher**: the grammar is small enough that byte scanners
//!   over fixed character classes replace a compiled pattern.
//! - **Explicit stack**: nesting is tracked with a stack of open mappings, not
//!   by recursion, so deeply nested input cannot overflow the call stack here.

use std::io::BufRead;
use std::ops::Range;

use crate::builder::TreeBuilder;
use crate::error::{Result, VdfError};
use crate::escape::unescape;
use crate::mapper::Mapper;
use crate::options::ParseOptions;
use crate::types::Value;

/// Byte-order marks stripped from the start of the first line.
const BOMS: [char; 2] = ['\u{FEFF}', '\u{FFFE}'];

/// Parse VDF text from a line-readable source.
///
/// The reader is consumed up to end of input; a syntax error stops the parse
/// and reports the source name, 1-based line number and offending line.
pub fn parse<M: Mapper, R: BufRead>(reader: R, options: &ParseOptions) -> Result<M> {
    TextParser::new(reader, options).run()
}

/// Parse VDF text held in memory.
///
/// ```
/// use vdf_core::{loads, Document, ParseOptions};
///
/// let doc: Document = loads("\"key1\" \"value1\"\nkey2 \"value2\"\n", &ParseOptions::default()).unwrap();
/// assert_eq!(doc.get_str("key1"), Some("value1"));
/// assert_eq!(doc.get_str("key2"), Some("value2"));
/// ```
pub fn loads<M: Mapper>(text: &str, options: &ParseOptions) -> Result<M> {
    parse(text.as_bytes(), options)
}

struct TextParser<'o, R, M: Mapper> {
    reader: R,
    options: &'o ParseOptions,
    tree: TreeBuilder<M>,
    /// Number of physical lines read so far.
    lineno: usize,
    /// A key without a value was seen; the next content line must be `{`.
    expect_bracket: bool,
}

impl<'o, R: BufRead, M: Mapper> TextParser<'o, R, M> {
    fn new(reader: R, options: &'o ParseOptions) -> Self {
        Self {
            reader,
            options,
            tree: TreeBuilder::new(options.merge_duplicate_keys),
            lineno: 0,
            expect_bracket: false,
        }
    }

    fn run(mut self) -> Result<M> {
        let mut last_line = String::new();

        while let Some(raw) = self.next_line()? {
            let mut text = raw.as_str();
            if self.lineno == 1 {
                text = text.trim_start_matches(BOMS);
            }
            let line = text.trim_start();
            last_line.clear();
            last_line.push_str(line);

            // blank lines and comments
            if line.is_empty() || line.starts_with('/') {
                continue;
            }

            if line.starts_with('{') {
                self.expect_bracket = false;
                continue;
            }

            if self.expect_bracket {
                return Err(self.syntax_error(self.lineno, "expected opening bracket", line));
            }

            if line.starts_with('}') {
                if !self.tree.close() {
                    return Err(self.syntax_error(
                        self.lineno,
                        "one too many closing parenthesis",
                        line,
                    ));
                }
                continue;
            }

            let start_line = self.lineno;
            self.parse_pair(line.to_string(), start_line)?;
        }

        if self.tree.depth() != 1 {
            return Err(self.syntax_error(
                self.lineno,
                "unclosed parenthesis or quotes (EOF)",
                &last_line,
            ));
        }

        let doc = self.tree.finish();
        tracing::debug!(
            source = self.options.source_name(),
            lines = self.lineno,
            entries = doc.len(),
            "parsed VDF text"
        );
        Ok(doc)
    }

    /// Match one key/value pair at the start of `line`, pulling in more
    /// physical lines while the pair is incomplete.
    fn parse_pair(&mut self, mut line: String, start_line: usize) -> Result<()> {
        loop {
            let Some(pair) = match_pair(&line) else {
                if self.extend(&mut line)? {
                    continue;
                }
                return Err(self.syntax_error(start_line, "unexpected EOF (open key quote?)", &line));
            };

            match pair.value {
                None => {
                    let key = self.decode_text(&line[pair.key]);
                    self.tree.open(key);
                    self.expect_bracket = true;
                }
                Some(value) if !value.closed => {
                    if self.extend(&mut line)? {
                        continue;
                    }
                    return Err(self.syntax_error(
                        start_line,
                        "unexpected EOF (open quote for value?)",
                        &line,
                    ));
                }
                Some(value) => {
                    let key = self.decode_text(&line[pair.key]);
                    let value = self.decode_text(&line[value.span]);
                    self.tree.insert(key, Value::String(value));
                }
            }
            return Ok(());
        }
    }

    /// Append the next physical line to `line`. Returns `false` at end of input.
    fn extend(&mut self, line: &mut String) -> Result<bool> {
        match self.next_line()? {
            Some(next) => {
                line.push_str(&next);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Read one physical line, keeping its terminator.
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.lineno += 1;
        Ok(Some(buf))
    }

    fn decode_text(&self, raw: &str) -> String {
        if self.options.escaped {
            unescape(raw)
        } else {
            raw.to_string()
        }
    }

    fn syntax_error(&self, line: usize, message: &'static str, text: &str) -> VdfError {
        VdfError::Syntax {
            source_name: self.options.source_name().to_string(),
            line,
            message,
            text: text.trim_end().to_string(),
        }
    }
}

/// Byte ranges of a key and optional value matched at the start of a line.
#[derive(Debug)]
struct PairMatch {
    key: Range<usize>,
    value: Option<ValueMatch>,
}

#[derive(Debug)]
struct ValueMatch {
    span: Range<usize>,
    /// False for a quoted value whose closing quote is not on the line yet.
    closed: bool,
}

/// Match `key [value]` anchored at the start of `line`.
///
/// Keys are `"..."` (non-empty) or a bare token with an optional leading `#`
/// (for `#include` / `#base`). Values are `"..."` or a bare token, separated
/// from the key by spaces or tabs.
fn match_pair(line: &str) -> Option<PairMatch> {
    let bytes = line.as_bytes();
    let (key, after_key) = match_key(bytes)?;
    Some(PairMatch {
        key,
        value: match_value(bytes, after_key),
    })
}

fn match_key(bytes: &[u8]) -> Option<(Range<usize>, usize)> {
    if bytes.first() == Some(&b'"') {
        let end = scan_quoted(bytes, 1);
        if end > 1 && bytes.get(end) == Some(&b'"') {
            return Some((1..end, end + 1));
        }
        return None;
    }

    let start = usize::from(bytes.first() == Some(&b'#'));
    let end = start + count_while(&bytes[start..], is_key_byte);
    if end > start {
        Some((0..end, end))
    } else {
        None
    }
}

fn match_value(bytes: &[u8], from: usize) -> Option<ValueMatch> {
    let start = from + count_while(&bytes[from..], |b| b == b' ' || b == b'\t');
    match bytes.get(start) {
        Some(b'"') => {
            let end = scan_quoted(bytes, start + 1);
            Some(ValueMatch {
                span: start + 1..end,
                closed: bytes.get(end) == Some(&b'"'),
            })
        }
        Some(&b) if is_value_byte(b) => {
            let end = start + count_while(&bytes[start..], is_value_byte);
            Some(ValueMatch {
                span: start..end,
                closed: true,
            })
        }
        _ => None,
    }
}

/// Scan the body of a quoted string starting at `from`. Returns the index of
/// the first byte not part of the body: the closing quote, a backslash that
/// cannot start an escape (end of input or newline follows), or `bytes.len()`.
fn scan_quoted(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => break,
            b'\\' => match bytes.get(i + 1) {
                Some(&next) if next != b'\n' => i += 2,
                _ => break,
            },
            _ => i += 1,
        }
    }
    i
}

fn count_while(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&b| pred(b)).count()
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'\\' | b'?')
}

fn is_value_byte(b: u8) -> bool {
    is_key_byte(b) || matches!(b, b'*' | b'.')
}
