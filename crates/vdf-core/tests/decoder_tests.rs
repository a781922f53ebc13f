use std::io::BufReader;

use vdf_core::{loads, parse, Document, ErrorKind, MultiDocument, ParseOptions, Value, VdfError};

fn load(text: &str) -> Document {
    loads(text, &ParseOptions::default()).unwrap()
}

fn load_raw(text: &str) -> Document {
    loads(text, &ParseOptions::default().with_escaped(false)).unwrap()
}

fn load_err(text: &str) -> VdfError {
    loads::<Document>(text, &ParseOptions::default()).unwrap_err()
}

fn doc(pairs: &[(&str, &str)]) -> Document {
    pairs.iter().copied().collect()
}

fn nested(key: &str, child: Document) -> Document {
    let mut d = Document::new();
    d.insert(key, child);
    d
}

// =============================================================================
// Flat key/value pairs
// =============================================================================

#[test]
fn empty_input() {
    assert!(load("").is_empty());
    assert!(load("\n\n   \n\t\n").is_empty());
}

#[test]
fn quoted_and_bare_pairs() {
    let text = r#"
        "key1" "value1"
        key2 "value2"
        KEY3 "value3"
        "key4" value4
        "key5" VALUE5
    "#;
    let expected = doc(&[
        ("key1", "value1"),
        ("key2", "value2"),
        ("KEY3", "value3"),
        ("key4", "value4"),
        ("key5", "VALUE5"),
    ]);
    assert_eq!(load(text), expected);
    assert_eq!(load_raw(text), expected);
}

#[test]
fn tabs_between_key_and_value() {
    assert_eq!(load("\"a\"\t\t\"b\"\n"), doc(&[("a", "b")]));
}

#[test]
fn empty_quoted_value() {
    assert_eq!(load("\"a\" \"\"\n"), doc(&[("a", "")]));
}

#[test]
fn no_trailing_newline() {
    assert_eq!(load("\"a\" \"b\""), doc(&[("a", "b")]));
}

#[test]
fn crlf_line_endings() {
    let parsed = load("\"a\" \"b\"\r\nc d\r\n");
    assert_eq!(parsed, doc(&[("a", "b"), ("c", "d")]));
}

#[test]
fn repeated_scalar_key_keeps_first_position() {
    let parsed = load("a 1\nb 2\na 3\n");
    assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(parsed.get_str("a"), Some("3"));
}

#[test]
fn trailing_text_after_pair_is_ignored() {
    let parsed = load("\"a\" \"b\" this is ignored\n");
    assert_eq!(parsed, doc(&[("a", "b")]));
}

#[test]
fn unquoted_value_symbols() {
    let text = "a asd.vdf\nb language_*lol*\nc zxc_-*.sss//\n";
    let expected = doc(&[("a", "asd.vdf"), ("b", "language_*lol*"), ("c", "zxc_-*.sss")]);
    assert_eq!(load(text), expected);
}

#[test]
fn hash_prefixed_keys() {
    let text = "#include \"asd.vdf\"\n#base asd.vdf\n";
    let expected = doc(&[("#include", "asd.vdf"), ("#base", "asd.vdf")]);
    assert_eq!(load(text), expected);
}

// =============================================================================
// Multi-line strings
// =============================================================================

#[test]
fn open_quoted_values_span_lines() {
    let text = "\"key1\" \"a\nb\nc\"\nkey2 \"a\nb\nc\"\n";
    let expected = doc(&[("key1", "a\nb\nc"), ("key2", "a\nb\nc")]);
    assert_eq!(load(text), expected);
    assert_eq!(load_raw(text), expected);
}

#[test]
fn open_quoted_key_spans_lines() {
    let parsed = load("\"multi\nline\" \"v\"\n");
    assert_eq!(parsed, doc(&[("multi\nline", "v")]));
}

#[test]
fn multi_line_value_then_more_pairs() {
    let parsed = load("\"a\" \"one\ntwo\"\n\"b\" \"c\"\n");
    assert_eq!(parsed, doc(&[("a", "one\ntwo"), ("b", "c")]));
}

// =============================================================================
// Nested mappings
// =============================================================================

#[test]
fn nested_mappings() {
    let text = r#"
        "root1"
        {
            "key1" "value1"
            key2 "value2"
        }
        root2
        {
            "key1" "value1"
            key2 value2
        }
    "#;
    let mut expected = Document::new();
    expected.insert("root1", doc(&[("key1", "value1"), ("key2", "value2")]));
    expected.insert("root2", doc(&[("key1", "value1"), ("key2", "value2")]));
    assert_eq!(load(text), expected);
}

#[test]
fn deep_nesting() {
    let text = r#"
        "root"
        {
            node1
            {
                "key" "value"
            }
            node2
            {
                "key" "value"
            }
            node3
            {
                "key" "value"
                node4
                {
                    "key" "value"
                }
            }
        }
    "#;
    let kv = doc(&[("key", "value")]);
    let mut node3 = kv.clone();
    node3.insert("node4", kv.clone());
    let mut root = Document::new();
    root.insert("node1", kv.clone());
    root.insert("node2", kv);
    root.insert("node3", node3);
    assert_eq!(load(text), nested("root", root));
}

#[test]
fn empty_nested_mapping() {
    let parsed = load("\"a\"\n{\n}\n");
    assert_eq!(parsed, nested("a", Document::new()));
}

#[test]
fn literal_example_round_trips_through_accessors() {
    let parsed = load("\"a\"\n{\n\t\"b\" \"c\"\n}\n");
    let inner = parsed.get_mapping("a").unwrap();
    assert_eq!(inner.get_str("b"), Some("c"));
    assert!(parsed.get("a").unwrap().is_mapping());
}

#[test]
fn comments_and_blank_lines() {
    let text = r#"
        // this is comment
        "key1" "value1" // another comment
        key2 "value2"   // further comments
        "key3" value3   ///

        // blank lines above
        key4 // comments comments comments
        {    // is this a comment?

        k v // comment

        }   // you only comment once

        "key5" // pretty much anything here
        {      // is this a comment?

            K V    //comment

        }
    "#;
    let mut expected = doc(&[("key1", "value1"), ("key2", "value2"), ("key3", "value3")]);
    expected.insert("key4", doc(&[("k", "v")]));
    expected.insert("key5", doc(&[("K", "V")]));
    assert_eq!(load(text), expected);
}

// =============================================================================
// Duplicate keys
// =============================================================================

const DUPLICATE_MAPPINGS: &str = "a\n{\n    a 1\n    b 2\n}\na\n{\n    a 3\n    c 4\n}\n";

#[test]
fn duplicate_mappings_merge() {
    let parsed = load(DUPLICATE_MAPPINGS);
    let expected = nested("a", doc(&[("a", "3"), ("b", "2"), ("c", "4")]));
    assert_eq!(parsed, expected);
}

#[test]
fn duplicate_mappings_replace_without_merge() {
    let options = ParseOptions::default().with_merge_duplicate_keys(false);
    let parsed: Document = loads(DUPLICATE_MAPPINGS, &options).unwrap();
    let expected = nested("a", doc(&[("a", "3"), ("c", "4")]));
    assert_eq!(parsed, expected);
}

#[test]
fn merge_onto_scalar_replaces_it() {
    let parsed = load("a 1\na\n{\nb 2\n}\n");
    assert_eq!(parsed, nested("a", doc(&[("b", "2")])));
}

#[test]
fn merge_keeps_first_position() {
    let parsed = load("a\n{\nx 1\n}\nb 2\na\n{\ny 3\n}\n");
    assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(parsed.get_mapping("a"), Some(&doc(&[("x", "1"), ("y", "3")])));
}

#[test]
fn multi_document_keeps_duplicates_without_merge() {
    let options = ParseOptions::default().with_merge_duplicate_keys(false);
    let parsed: MultiDocument = loads(DUPLICATE_MAPPINGS, &options).unwrap();
    assert_eq!(parsed.len(), 2);

    let blocks: Vec<_> = parsed.get_all("a").collect();
    assert_eq!(blocks.len(), 2);
    let second = blocks[1].as_mapping().unwrap();
    assert_eq!(second.get("a"), Some(&Value::from("3")));
    assert_eq!(second.get("c"), Some(&Value::from("4")));
    assert!(parsed.has_duplicates());
}

#[test]
fn multi_document_merges_into_first_block() {
    let parsed: MultiDocument = loads(DUPLICATE_MAPPINGS, &ParseOptions::default()).unwrap();
    assert_eq!(parsed.len(), 1);
    // MultiDocument appends scalars, so the inner `a` appears twice.
    let inner = parsed.get("a").unwrap().as_mapping().unwrap();
    assert_eq!(inner.keys().collect::<Vec<_>>(), vec!["a", "b", "a", "c"]);
}

#[test]
fn multi_document_keeps_duplicate_scalars() {
    let parsed: MultiDocument = loads("k 1\nk 2\n", &ParseOptions::default()).unwrap();
    let values: Vec<_> = parsed.get_all("k").filter_map(Value::as_str).collect();
    assert_eq!(values, vec!["1", "2"]);
}

// =============================================================================
// Escapes
// =============================================================================

#[test]
fn escaped_backslash_before_closing_quote() {
    let text = r#""aaa\\" "1""#;
    assert_eq!(load(text), doc(&[("aaa\\", "1")]));
    assert_eq!(load_raw(text), doc(&[("aaa\\\\", "1")]));
}

#[test]
fn escaped_backslash_before_closing_quote_in_value() {
    let text = r#""1" "aaa\\""#;
    assert_eq!(load(text), doc(&[("1", "aaa\\")]));
    assert_eq!(load_raw(text), doc(&[("1", "aaa\\\\")]));
}

#[test]
fn escaped_quote_inside_value() {
    let text = r#""say" "\"hi\"""#;
    assert_eq!(load(text), doc(&[("say", "\"hi\"")]));
}

#[test]
fn escape_sequences_decoded_only_when_escaped() {
    let text = r#""a" "line\nbreak""#;
    assert_eq!(load(text), doc(&[("a", "line\nbreak")]));
    assert_eq!(load_raw(text), doc(&[("a", "line\\nbreak")]));
}

// =============================================================================
// Byte-order marks
// =============================================================================

#[test]
fn leading_bom_is_stripped() {
    assert_eq!(load("\u{FEFF}\"asd\" \"123\""), doc(&[("asd", "123")]));
    assert_eq!(load("\u{FFFE}\"asd\" \"123\""), doc(&[("asd", "123")]));
}

#[test]
fn bom_then_whitespace_is_stripped() {
    assert_eq!(load("\u{FEFF}  asd 123\n"), doc(&[("asd", "123")]));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn malformed_inputs_are_rejected() {
    let cases = [
        "\"asd\"\n\"zxc\" \"333\"\n\"",
        "asd\nzxc 333\n\"",
        "\"asd\" \"123\"\n\"zxc\" \"333\"\n\"",
        "asd 123\nzxc 333\n\"",
        "\"asd\n\n\n\n\nzxc",
        "\"asd\" \"bbb\n\n\n\n\nzxc",
        "\"asd\"\n{\n\"zxc\" \"123\"\n}\n}\n}\n}\n",
        "asd\n{\nzxc 123\n}\n}\n}\n}\n",
        "\"asd\"\n{\n\"zxc\" \"333\"\n",
        "asd\n{\nzxc 333\n",
    ];
    for case in cases {
        let result = loads::<Document>(case, &ParseOptions::default());
        assert!(result.is_err(), "expected an error for {case:?}");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Format, "{case:?}");
    }
}

#[test]
fn extra_closing_brace_reports_line() {
    match load_err("\"a\"\n{\n\"b\" \"c\"\n}\n}\n") {
        VdfError::Syntax { line, message, .. } => {
            assert_eq!(line, 5);
            assert_eq!(message, "one too many closing parenthesis");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn missing_opening_bracket() {
    match load_err("\"a\"\n\"b\" \"c\"\n") {
        VdfError::Syntax { line, message, text, .. } => {
            assert_eq!(line, 2);
            assert_eq!(message, "expected opening bracket");
            assert_eq!(text, "\"b\" \"c\"");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn unterminated_key_quote_reports_start_line() {
    match load_err("\"a\n\n\n\nb") {
        VdfError::Syntax { line, message, .. } => {
            assert_eq!(line, 1);
            assert!(message.contains("EOF"), "{message}");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn unterminated_value_quote_reports_start_line() {
    match load_err("x 1\n\"a\" \"b\n\n") {
        VdfError::Syntax { line, message, .. } => {
            assert_eq!(line, 2);
            assert_eq!(message, "unexpected EOF (open quote for value?)");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn unclosed_mapping_at_eof() {
    match load_err("a\n{\nb c\n") {
        VdfError::Syntax { message, .. } => {
            assert_eq!(message, "unclosed parenthesis or quotes (EOF)");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn source_name_appears_in_error() {
    let options = ParseOptions::default().with_source_name("appmanifest_400.acf");
    let err = loads::<Document>("}\n", &options).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("appmanifest_400.acf:1:"), "{message}");
}

#[test]
fn default_source_name() {
    let message = load_err("}\n").to_string();
    assert!(message.starts_with("<input>:1:"), "{message}");
}

// =============================================================================
// Reader input
// =============================================================================

#[test]
fn parse_from_buf_reader() {
    let bytes = b"\"AppState\"\n{\n\t\"appid\" \"400\"\n}\n";
    let parsed: Document = parse(BufReader::new(&bytes[..]), &ParseOptions::default()).unwrap();
    assert_eq!(parsed, nested("AppState", doc(&[("appid", "400")])));
}

#[test]
fn invalid_utf8_is_an_io_error() {
    let bytes: &[u8] = b"\"a\" \"\xff\xfe\"\n";
    let err = parse::<Document, _>(bytes, &ParseOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
