//! Snapshot coverage of the token stream for a document exercising most of
//! the extended grammar at once.

use flexjson::{JsonTextReader, TokenValue};
use std::fmt::Write as _;

fn render(input: &str) -> String {
    let mut reader = JsonTextReader::from_str(input);
    let mut out = String::new();
    while reader.read().unwrap() {
        let tok = reader.current_token();
        write!(out, "{:?}", tok.kind).unwrap();
        match &tok.value {
            TokenValue::None => {}
            TokenValue::Str(s) => write!(out, " {s:?}").unwrap(),
            TokenValue::Integer(i) => write!(out, " {i}").unwrap(),
            TokenValue::Float(f) => write!(out, " {f}").unwrap(),
            TokenValue::Decimal(d) => write!(out, " {d}").unwrap(),
            TokenValue::Bool(b) => write!(out, " {b}").unwrap(),
            TokenValue::Bytes(b) => write!(out, " {b:?}").unwrap(),
            TokenValue::Date(d) => write!(out, " {d:?}").unwrap(),
        }
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

#[test]
fn mixed_grammar_document() {
    let input = r#"{
        name: 'flexjson',
        version: 1,
        legacy: 0x1A,
        /* nested container */
        tags: [true, false, null, undefined],
        ctor: new Point(1, 2),
    }"#;

    insta::assert_snapshot!(render(input), @r#"
    StartObject
    PropertyName "name"
    String "flexjson"
    PropertyName "version"
    Integer 1
    PropertyName "legacy"
    Integer 26
    Comment " nested container "
    PropertyName "tags"
    StartArray
    Boolean true
    Boolean false
    Null
    Undefined
    EndArray
    PropertyName "ctor"
    StartConstructor "Point"
    Integer 1
    Integer 2
    EndConstructor
    EndObject
    "#);
}
