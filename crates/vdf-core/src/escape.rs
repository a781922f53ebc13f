//! KeyValues string escaping.
//!
//! Eleven characters have a two-character backslash form. The table matches
//! the one used by Valve's `CUtlBuffer` text reader, so files written by the
//! game tools read back unchanged.

/// Letter written after the backslash for `c`, if `c` needs escaping.
fn escape_letter(c: char) -> Option<char> {
    match c {
        '\n' => Some('n'),
        '\t' => Some('t'),
        '\u{0B}' => Some('v'),
        '\u{08}' => Some('b'),
        '\r' => Some('r'),
        '\u{0C}' => Some('f'),
        '\u{07}' => Some('a'),
        '\\' => Some('\\'),
        '?' => Some('?'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Raw character denoted by `\<letter>`, if `letter` is a known escape.
fn unescape_letter(letter: char) -> Option<char> {
    match letter {
        'n' => Some('\n'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        'b' => Some('\u{08}'),
        'r' => Some('\r'),
        'f' => Some('\u{0C}'),
        'a' => Some('\u{07}'),
        '\\' => Some('\\'),
        '?' => Some('?'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Replace every escapable character in `s` with its backslash sequence.
///
/// ```
/// use vdf_core::escape;
/// assert_eq!(escape("say \"hi\"\n"), r#"say \"hi\"\n"#);
/// ```
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_letter(c) {
            Some(letter) => {
                out.push('\\');
                out.push(letter);
            }
            None => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape`]. A backslash that does not start one of the known
/// sequences is kept as-is, and scanning resumes at the character after it.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied().and_then(unescape_letter) {
            Some(raw) => {
                chars.next();
                out.push(raw);
            }
            None => out.push('\\'),
        }
    }
    out
}
