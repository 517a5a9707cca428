//! Window refill/shift/grow paths under adversarial chunking: the source
//! hands back only a handful of bytes per `read` call, so every scalar that
//! crosses a chunk boundary forces a refill mid-token.

mod common;

use std::io::Cursor;

use common::ShortReadAdapter;
use flexjson::{JsonTextReader, TokenKind, TokenValue};

fn collect_kinds<R: std::io::Read>(mut reader: JsonTextReader<R>) -> Vec<TokenKind> {
    let mut out = Vec::new();
    while reader.read().unwrap() {
        out.push(reader.current_token().kind);
    }
    out
}

#[test]
fn single_byte_reads_still_tokenize_correctly() {
    let json = r#"{"hello": "world"}"#;
    let adapter = ShortReadAdapter::new(Cursor::new(json.as_bytes().to_vec()), 1);
    let reader = JsonTextReader::with_capacity(adapter, 4);
    assert_eq!(
        collect_kinds(reader),
        vec![
            TokenKind::StartObject,
            TokenKind::PropertyName,
            TokenKind::String,
            TokenKind::EndObject,
        ]
    );
}

#[test]
fn tiny_window_forces_growth_for_long_strings() {
    let json = r#"["this string is much longer than the initial window capacity"]"#;
    let mut reader = JsonTextReader::with_capacity(Cursor::new(json.as_bytes().to_vec()), 4);
    assert!(reader.read().unwrap()); // StartArray
    assert!(reader.read().unwrap());
    let TokenValue::Str(s) = &reader.current_token().value else {
        panic!("expected a string token");
    };
    assert_eq!(s, "this string is much longer than the initial window capacity");
}

#[test]
fn escape_sequence_spanning_a_read_boundary() {
    let json = r#"{"msg": "a\nb\tc"}"#;
    let adapter = ShortReadAdapter::new(Cursor::new(json.as_bytes().to_vec()), 3);
    let mut reader = JsonTextReader::with_capacity(adapter, 4);
    reader.read().unwrap(); // StartObject
    reader.read().unwrap(); // PropertyName
    reader.read().unwrap(); // String
    assert_eq!(
        reader.current_token().value,
        TokenValue::Str("a\nb\tc".into())
    );
}

#[test]
fn unicode_escape_split_across_reads() {
    // \u00E9 is 'é', written as a \uXXXX escape so the window must refill
    // mid-escape under a 2-byte-per-read adapter.
    let json = "\"\\u00E9\"";
    let adapter = ShortReadAdapter::new(Cursor::new(json.as_bytes().to_vec()), 2);
    let mut reader = JsonTextReader::with_capacity(adapter, 3);
    reader.read().unwrap();
    assert_eq!(reader.current_token().value, TokenValue::Str("\u{e9}".into()));
}

#[test]
fn unescaped_utf8_passes_through_unchanged() {
    let json = "\"\u{1f600}\""; // U+1F600, written directly as UTF-8, no escape
    let mut reader = JsonTextReader::from_str(json);
    reader.read().unwrap();
    assert_eq!(
        reader.current_token().value,
        TokenValue::Str("\u{1f600}".into())
    );
}

#[test]
fn surrogate_pair_escape_combines_into_one_scalar() {
    // \uD83D\uDE00 is the UTF-16 surrogate pair for U+1F600 (grinning face).
    let json = "\"\\uD83D\\uDE00\"";
    let mut reader = JsonTextReader::from_str(json);
    reader.read().unwrap();
    assert_eq!(
        reader.current_token().value,
        TokenValue::Str("\u{1f600}".into())
    );
}
