//! Error types for tokenization.

use std::fmt::{self, Display};

use crate::span::Span;

/// Error produced while tokenizing or coercing a token.
#[derive(Debug)]
pub struct ReaderError {
    /// The specific kind of error.
    pub kind: ReaderErrorKind,
    /// Source span where the error occurred.
    pub span: Option<Span>,
    /// 1-based line number at the point of failure.
    pub line_number: u64,
    /// 0-based column at the point of failure.
    pub line_position: u64,
    /// The source input, attached lazily for diagnostics.
    pub source_code: Option<String>,
}

impl Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {}, position {})",
            self.kind, self.line_number, self.line_position
        )
    }
}

impl std::error::Error for ReaderError {}

impl ReaderError {
    /// Attach source text so a `miette` reporter can render a snippet.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source_code = Some(source.to_string());
        self
    }
}

/// The specific kinds of error this reader can raise.
#[derive(Debug)]
pub enum ReaderErrorKind {
    /// A string was still open when the source ran out.
    UnterminatedString,
    /// An escape sequence inside a string was malformed.
    BadEscape(String),
    /// The source ran out mid-token.
    UnexpectedEndOfInput(&'static str),
    /// A character was encountered where none of the grammar's productions apply.
    UnexpectedCharacter(char),
    /// An unquoted property name or constructor name was malformed.
    BadIdentifier(String),
    /// A decimal integer literal did not fit in the target width.
    IntegerOverflow(String),
    /// A typed read adapter could not coerce a string token to its target type.
    CoercionFailure(String),
    /// A typed read adapter received a token kind it cannot use.
    UnexpectedToken(String),
    /// Non-whitespace content followed a fully-read top-level value.
    TrailingGarbage,
    /// An operation was attempted in a state that forbids it (e.g. after `close`).
    IllegalState(&'static str),
    /// A scalar's textual form was well-formed lexically but invalid semantically
    /// (bad base64, byte out of range, malformed `/Date(...)/ ` body, ...).
    InvalidValue(String),
    /// The upstream `Read` implementation returned an I/O error.
    Io(String),
}

impl Display for ReaderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderErrorKind::UnterminatedString => write!(f, "unterminated string"),
            ReaderErrorKind::BadEscape(e) => write!(f, "bad escape sequence '{e}'"),
            ReaderErrorKind::UnexpectedEndOfInput(ctx) => {
                write!(f, "unexpected end of input while parsing {ctx}")
            }
            ReaderErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character '{c}'"),
            ReaderErrorKind::BadIdentifier(s) => write!(f, "bad identifier '{s}'"),
            ReaderErrorKind::IntegerOverflow(lexeme) => {
                write!(f, "integer overflow parsing '{lexeme}'")
            }
            ReaderErrorKind::CoercionFailure(msg) => write!(f, "coercion failure: {msg}"),
            ReaderErrorKind::UnexpectedToken(msg) => write!(f, "unexpected token: {msg}"),
            ReaderErrorKind::TrailingGarbage => {
                write!(f, "additional text encountered after finished reading JSON content")
            }
            ReaderErrorKind::IllegalState(ctx) => write!(f, "illegal operation: {ctx}"),
            ReaderErrorKind::InvalidValue(msg) => write!(f, "invalid value: {msg}"),
            ReaderErrorKind::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl ReaderErrorKind {
    /// A stable, namespaced error code suitable for machine matching.
    pub const fn code(&self) -> &'static str {
        match self {
            ReaderErrorKind::UnterminatedString => "flexjson::unterminated_string",
            ReaderErrorKind::BadEscape(_) => "flexjson::bad_escape",
            ReaderErrorKind::UnexpectedEndOfInput(_) => "flexjson::unexpected_eof",
            ReaderErrorKind::UnexpectedCharacter(_) => "flexjson::unexpected_character",
            ReaderErrorKind::BadIdentifier(_) => "flexjson::bad_identifier",
            ReaderErrorKind::IntegerOverflow(_) => "flexjson::integer_overflow",
            ReaderErrorKind::CoercionFailure(_) => "flexjson::coercion_failure",
            ReaderErrorKind::UnexpectedToken(_) => "flexjson::unexpected_token",
            ReaderErrorKind::TrailingGarbage => "flexjson::trailing_garbage",
            ReaderErrorKind::IllegalState(_) => "flexjson::illegal_state",
            ReaderErrorKind::InvalidValue(_) => "flexjson::invalid_value",
            ReaderErrorKind::Io(_) => "flexjson::io",
        }
    }

    /// A short label describing what the span points at.
    pub fn label(&self) -> String {
        match self {
            ReaderErrorKind::UnterminatedString => "string never closed".into(),
            ReaderErrorKind::BadEscape(e) => format!("bad escape '{e}' here"),
            ReaderErrorKind::UnexpectedEndOfInput(ctx) => format!("input ends here, inside {ctx}"),
            ReaderErrorKind::UnexpectedCharacter(c) => format!("unexpected '{c}'"),
            ReaderErrorKind::BadIdentifier(s) => format!("'{s}' is not a valid identifier"),
            ReaderErrorKind::IntegerOverflow(lexeme) => format!("'{lexeme}' overflows"),
            ReaderErrorKind::CoercionFailure(_) => "cannot coerce this token".into(),
            ReaderErrorKind::UnexpectedToken(_) => "this token was not expected here".into(),
            ReaderErrorKind::TrailingGarbage => "unexpected trailing content".into(),
            ReaderErrorKind::IllegalState(_) => "not valid in the reader's current state".into(),
            ReaderErrorKind::InvalidValue(msg) => msg.clone(),
            ReaderErrorKind::Io(msg) => msg.clone(),
        }
    }
}

impl miette::Diagnostic for ReaderError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_code
            .as_ref()
            .map(|s| s as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(miette::LabeledSpan::new(
            Some(self.kind.label()),
            span.offset,
            span.len.max(1),
        ))))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReaderError>;
