//! The token types emitted by the tokenizer.

use rust_decimal::Decimal;

use crate::date::DateValue;

/// Which delimiter, if any, bounded a string or property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteChar {
    /// Delimited by `"`.
    Double,
    /// Delimited by `'`.
    Single,
    /// Unquoted (only valid for property names).
    None,
}

impl QuoteChar {
    pub(crate) fn from_byte(b: u8) -> Self {
        match b {
            b'"' => QuoteChar::Double,
            b'\'' => QuoteChar::Single,
            other => unreachable!("not a quote byte: {other}"),
        }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// No token has been read yet.
    None,
    /// `{`.
    StartObject,
    /// `[`.
    StartArray,
    /// `new Name(`.
    StartConstructor,
    /// An object key, quoted or bare.
    PropertyName,
    /// A `/* ... */` block comment.
    Comment,
    /// A base-10, hex, or octal integer literal.
    Integer,
    /// A scientific-notation number, or `NaN`/`Infinity`/`-Infinity`.
    Float,
    /// A quoted string, unless upgraded to [`TokenKind::Date`].
    String,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// `undefined`, or the implicit hole left by a skipped array element.
    Undefined,
    /// `}`.
    EndObject,
    /// `]`.
    EndArray,
    /// `)` closing a `new Name(...)`.
    EndConstructor,
    /// A `/Date(...)/` literal, recognized inside a quoted string.
    Date,
    /// Base-64-decoded binary, produced only by `read_as_bytes`.
    Bytes,
}

/// The payload carried by a [`Token`], kind-dependent.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No payload (structural markers, `Null`).
    None,
    /// Carries property names, strings, comments, and constructor names.
    Str(String),
    /// A 64-bit signed integer, or the narrower result of `read_as_int32`.
    Integer(i64),
    /// An IEEE-754 double, including `NaN`/`±Infinity`.
    Float(f64),
    /// An arbitrary-precision decimal, produced only by `read_as_decimal`.
    Decimal(Decimal),
    /// `true`/`false`.
    Bool(bool),
    /// Binary data, from `read_as_bytes`.
    Bytes(Vec<u8>),
    /// A recognized `/Date(...)/ ` literal.
    Date(DateValue),
}

/// A single lexical unit emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Which kind of token this is.
    pub kind: TokenKind,
    /// The kind-dependent payload.
    pub value: TokenValue,
    /// Which delimiter, if any, bounded the token's source text.
    pub quote: QuoteChar,
}

impl Token {
    pub(crate) fn marker(kind: TokenKind) -> Self {
        Token {
            kind,
            value: TokenValue::None,
            quote: QuoteChar::None,
        }
    }
}

/// Tracks whether a materialized string came straight from the window (the
/// zero-copy fast path — no escapes to process) or had to be assembled in
/// the auxiliary [`StringBuffer`](crate::string_buffer::StringBuffer)
/// because it contained an escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringOrigin {
    Window,
    Buffer,
}
