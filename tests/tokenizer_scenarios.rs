//! End-to-end token-stream scenarios, covering the worked examples from the
//! tokenizer's design document.

use flexjson::{JsonTextReader, QuoteChar, ReaderErrorKind, TokenKind, TokenValue};

fn read_all(input: &str) -> Vec<(TokenKind, TokenValue, QuoteChar)> {
    let mut reader = JsonTextReader::from_str(input);
    let mut out = Vec::new();
    while reader.read().unwrap() {
        let tok = reader.current_token();
        out.push((tok.kind, tok.value.clone(), tok.quote));
    }
    out
}

#[test]
fn scenario_1_simple_object_with_array() {
    let toks = read_all(r#"{"a":1,"b":[true,null]}"#);
    let kinds: Vec<_> = toks.iter().map(|(k, ..)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::StartObject,
            TokenKind::PropertyName,
            TokenKind::Integer,
            TokenKind::PropertyName,
            TokenKind::StartArray,
            TokenKind::Boolean,
            TokenKind::Null,
            TokenKind::EndArray,
            TokenKind::EndObject,
        ]
    );
    assert_eq!(toks[1].1, TokenValue::Str("a".into()));
    assert_eq!(toks[2].1, TokenValue::Integer(1));
}

#[test]
fn scenario_2_unquoted_keys_single_quotes_and_hex() {
    let toks = read_all("{a:'x\n',b:0xFF}");
    assert_eq!(toks[1].0, TokenKind::PropertyName);
    assert_eq!(toks[1].2, QuoteChar::None);
    assert_eq!(toks[2].1, TokenValue::Str("x\n".into()));
    assert_eq!(toks[2].2, QuoteChar::Single);
    assert_eq!(toks[4].1, TokenValue::Integer(255));
}

#[test]
fn scenario_3_nan_infinity_and_scientific_notation() {
    let toks = read_all("[NaN,-Infinity,1.5e2]");
    match &toks[1].1 {
        TokenValue::Float(f) => assert!(f.is_nan()),
        other => panic!("expected a float, got {other:?}"),
    }
    assert_eq!(toks[2].1, TokenValue::Float(f64::NEG_INFINITY));
    assert_eq!(toks[3].1, TokenValue::Float(150.0));
}

#[test]
fn scenario_4_constructor_syntax() {
    let toks = read_all("new Date(1234567890123)");
    assert_eq!(toks[0].0, TokenKind::StartConstructor);
    assert_eq!(toks[0].1, TokenValue::Str("Date".into()));
    assert_eq!(toks[1].1, TokenValue::Integer(1_234_567_890_123));
    assert_eq!(toks[2].0, TokenKind::EndConstructor);
}

#[test]
fn scenario_5_date_literal_with_offset() {
    let mut reader = JsonTextReader::from_str(r#""\/Date(0+0500)\/""#);
    let dt = reader.read_as_date_time_offset().unwrap().unwrap();
    assert_eq!(dt.timestamp(), 0);
    assert_eq!(dt.offset().local_minus_utc(), 5 * 3600);
}

#[test]
fn scenario_6_comment_and_skipped_element() {
    let toks = read_all("[/*c*/ 1 ,, 2]");
    let kinds: Vec<_> = toks.iter().map(|(k, ..)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::StartArray,
            TokenKind::Comment,
            TokenKind::Integer,
            TokenKind::Undefined,
            TokenKind::Integer,
            TokenKind::EndArray,
        ]
    );
    assert_eq!(toks[1].1, TokenValue::Str("c".into()));
}

#[test]
fn scenario_7_base64_via_read_as_bytes() {
    let mut reader = JsonTextReader::from_str(r#""SGVsbG8=""#);
    let bytes = reader.read_as_bytes().unwrap().unwrap();
    assert_eq!(bytes, b"Hello");
}

#[test]
fn scenario_8_unterminated_object_then_idempotent_failure() {
    let mut reader = JsonTextReader::from_str("{");
    assert!(reader.read().unwrap());
    assert_eq!(reader.current_token().kind, TokenKind::StartObject);

    let err = reader.read().unwrap_err();
    assert!(matches!(err.kind, ReaderErrorKind::UnexpectedEndOfInput(_)));
    assert_eq!(err.line_number, 1);
}

#[test]
fn coercion_consistency_literal_and_quoted_int() {
    let mut a = JsonTextReader::from_str("42");
    assert_eq!(a.read_as_int32().unwrap(), Some(42));

    let mut b = JsonTextReader::from_str(r#""42""#);
    assert_eq!(b.read_as_int32().unwrap(), Some(42));
}

#[test]
fn idempotent_eof_after_clean_finish() {
    let mut reader = JsonTextReader::from_str("[1,2]");
    while reader.read().unwrap() {}
    // Once a clean EOF has been observed, further reads keep returning false.
    assert!(!reader.read().unwrap());
    assert!(!reader.read().unwrap());
}

#[test]
fn line_and_column_tracking_across_newlines() {
    let mut reader = JsonTextReader::from_str("[\n  1,\n  2\n]");
    while reader.read().unwrap() {}
    assert_eq!(reader.line_number(), 4);
}
