//! The state machine: consumes a [`CharWindow`], emits [`Token`]s, and drives
//! [`ReaderState`] transitions.

use std::io::Read;

use crate::char_window::CharWindow;
use crate::date::parse_date_literal;
use crate::error::{ReaderErrorKind, Result};
use crate::mode::ReadMode;
use crate::state::{Container, ReaderState};
use crate::string_buffer::StringBuffer;
use crate::token::{QuoteChar, StringOrigin, Token, TokenKind, TokenValue};

/// The outcome of one step through the state machine.
pub(crate) enum Step {
    /// A token was produced; the caller should surface it.
    Token(Token),
    /// No token yet, just a state transition (e.g. the comma in `PostValue`);
    /// the caller should re-enter the dispatch loop.
    Continue,
    /// Clean end of input.
    Eof,
}

pub(crate) struct Tokenizer {
    pub(crate) state: ReaderState,
    stack: Vec<Container>,
    scratch: StringBuffer,
}

impl Tokenizer {
    pub(crate) fn new() -> Self {
        Self {
            state: ReaderState::Start,
            stack: Vec::new(),
            scratch: StringBuffer::new(),
        }
    }

    fn in_constructor(&self) -> bool {
        matches!(self.stack.last(), Some(Container::Constructor))
    }

    /// After emitting a scalar or an End* token: `PostValue` if still nested,
    /// `Finished` if the stack just emptied out.
    fn after_value(&mut self) {
        self.state = if self.stack.is_empty() {
            ReaderState::Finished
        } else {
            ReaderState::PostValue
        };
    }

    /// Dispatch on `ReaderState` to the sub-parser responsible for it.
    pub(crate) fn step<R: Read>(&mut self, w: &mut CharWindow<R>, mode: ReadMode) -> Result<Step> {
        log::trace!("tokenizer: step from state {:?}", self.state);
        match self.state {
            ReaderState::Start
            | ReaderState::Property
            | ReaderState::Array
            | ReaderState::ArrayStart
            | ReaderState::Constructor
            | ReaderState::ConstructorStart => self.parse_value(w, mode),
            ReaderState::Object | ReaderState::ObjectStart => self.parse_object(w),
            ReaderState::PostValue => self.parse_post_value(w),
            ReaderState::Finished => self.parse_finished(w),
            ReaderState::Complete | ReaderState::Closed | ReaderState::Error => Ok(Step::Eof),
        }
    }

    /// Scan a value in value position: a scalar, a string, a structural
    /// opener, or one of the extended-grammar literals.
    fn parse_value<R: Read>(&mut self, w: &mut CharWindow<R>, mode: ReadMode) -> Result<Step> {
        log::trace!("tokenizer: parse_value, stack depth {}", self.stack.len());
        loop {
            if !w.ensure(0, false)? {
                return if self.stack.is_empty() {
                    self.state = ReaderState::Complete;
                    Ok(Step::Eof)
                } else {
                    Err(w.error_here(ReaderErrorKind::UnexpectedEndOfInput("a value")))
                };
            }
            match w.byte_at(0) {
                b' ' | b'\t' => w.advance(1),
                b'\r' | b'\n' => w.consume_newline()?,
                b'"' => return self.read_quoted_value(w, mode, b'"'),
                b'\'' => return self.read_quoted_value(w, mode, b'\''),
                b't' => {
                    self.match_word(w, "true")?;
                    self.after_value();
                    return Ok(Step::Token(Token {
                        kind: TokenKind::Boolean,
                        value: TokenValue::Bool(true),
                        quote: QuoteChar::None,
                    }));
                }
                b'f' => {
                    self.match_word(w, "false")?;
                    self.after_value();
                    return Ok(Step::Token(Token {
                        kind: TokenKind::Boolean,
                        value: TokenValue::Bool(false),
                        quote: QuoteChar::None,
                    }));
                }
                b'n' => match w.peek_at(1, false)? {
                    Some(b'u') => {
                        self.match_word(w, "null")?;
                        self.after_value();
                        return Ok(Step::Token(Token::marker(TokenKind::Null)));
                    }
                    Some(b'e') => return self.parse_constructor(w),
                    _ => {
                        return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter('n')));
                    }
                },
                b'u' => {
                    self.match_word(w, "undefined")?;
                    self.after_value();
                    return Ok(Step::Token(Token::marker(TokenKind::Undefined)));
                }
                b'N' => {
                    self.match_word(w, "NaN")?;
                    self.after_value();
                    return Ok(Step::Token(Token {
                        kind: TokenKind::Float,
                        value: TokenValue::Float(f64::NAN),
                        quote: QuoteChar::None,
                    }));
                }
                b'I' => {
                    self.match_word(w, "Infinity")?;
                    self.after_value();
                    return Ok(Step::Token(Token {
                        kind: TokenKind::Float,
                        value: TokenValue::Float(f64::INFINITY),
                        quote: QuoteChar::None,
                    }));
                }
                b'-' => {
                    if w.peek_at(1, false)? == Some(b'I') {
                        self.match_word(w, "-Infinity")?;
                        self.after_value();
                        return Ok(Step::Token(Token {
                            kind: TokenKind::Float,
                            value: TokenValue::Float(f64::NEG_INFINITY),
                            quote: QuoteChar::None,
                        }));
                    }
                    return self.parse_number(w, mode);
                }
                b'0'..=b'9' | b'.' => return self.parse_number(w, mode),
                b'/' => return self.parse_comment(w),
                b'{' => {
                    w.advance(1);
                    self.stack.push(Container::Object);
                    self.state = ReaderState::ObjectStart;
                    return Ok(Step::Token(Token::marker(TokenKind::StartObject)));
                }
                b'[' => {
                    w.advance(1);
                    self.stack.push(Container::Array);
                    self.state = ReaderState::ArrayStart;
                    return Ok(Step::Token(Token::marker(TokenKind::StartArray)));
                }
                b']' if self.stack.last() == Some(&Container::Array) => {
                    w.advance(1);
                    self.stack.pop();
                    self.after_value();
                    return Ok(Step::Token(Token::marker(TokenKind::EndArray)));
                }
                b')' if self.in_constructor() => {
                    w.advance(1);
                    self.stack.pop();
                    self.after_value();
                    return Ok(Step::Token(Token::marker(TokenKind::EndConstructor)));
                }
                b',' => {
                    self.after_value();
                    return Ok(Step::Token(Token::marker(TokenKind::Undefined)));
                }
                other => {
                    return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter(other as char)));
                }
            }
        }
    }

    /// Scan the start of an object body: whitespace, a comment, the closing
    /// `}`, or a property.
    fn parse_object<R: Read>(&mut self, w: &mut CharWindow<R>) -> Result<Step> {
        log::trace!("tokenizer: parse_object, stack depth {}", self.stack.len());
        loop {
            if !w.ensure(0, false)? {
                return Err(w.error_here(ReaderErrorKind::UnexpectedEndOfInput("an object")));
            }
            match w.byte_at(0) {
                b' ' | b'\t' => w.advance(1),
                b'\r' | b'\n' => w.consume_newline()?,
                b'}' => {
                    w.advance(1);
                    self.stack.pop();
                    self.after_value();
                    return Ok(Step::Token(Token::marker(TokenKind::EndObject)));
                }
                b'/' => return self.parse_comment(w),
                _ => return self.parse_property(w),
            }
        }
    }

    /// Scan a property name, quoted or bare, followed by its `:` separator.
    fn parse_property<R: Read>(&mut self, w: &mut CharWindow<R>) -> Result<Step> {
        log::trace!("tokenizer: parse_property");
        let c = w.byte_at(0);
        let (name, quote) = if c == b'"' || c == b'\'' {
            let (s, _origin) = self.scan_quoted(w, c)?;
            (s, QuoteChar::from_byte(c))
        } else if is_ident_char(c) {
            w.shift_if_needed();
            let start = w.pos;
            loop {
                if !w.ensure(0, true)? {
                    break;
                }
                let b = w.byte_at(0);
                if b == b' ' || b == b'\t' || b == b'\r' || b == b'\n' || b == b':' {
                    break;
                }
                if is_ident_char(b) {
                    w.advance(1);
                } else {
                    break;
                }
            }
            if w.pos == start {
                return Err(w.error_here(ReaderErrorKind::BadIdentifier(
                    "empty property name".into(),
                )));
            }
            let name = w.slice_to_string(start, w.pos)?;
            (name, QuoteChar::None)
        } else {
            return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter(c as char)));
        };
        w.skip_whitespace()?;
        if w.peek_at(0, false)? != Some(b':') {
            return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter(':')));
        }
        w.advance(1);
        self.state = ReaderState::Property;
        Ok(Step::Token(Token {
            kind: TokenKind::PropertyName,
            value: TokenValue::Str(name),
            quote,
        }))
    }

    /// Scan a `new Name(` opener and emit `StartConstructor`. Argument
    /// values are then read as ordinary values in `Constructor` state; the
    /// matching `)` is handled by `parse_value`/`parse_post_value`.
    fn parse_constructor<R: Read>(&mut self, w: &mut CharWindow<R>) -> Result<Step> {
        log::trace!("tokenizer: parse_constructor");
        self.match_word(w, "new")?;
        w.skip_whitespace()?;
        w.shift_if_needed();
        let start = w.pos;
        loop {
            if !w.ensure(0, true)? {
                break;
            }
            match w.byte_at(0) {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => w.advance(1),
                _ => break,
            }
        }
        if w.pos == start {
            return Err(w.error_here(ReaderErrorKind::BadIdentifier(
                "expected a constructor name".into(),
            )));
        }
        let name = w.slice_to_string(start, w.pos)?;
        w.skip_whitespace()?;
        if w.peek_at(0, false)? != Some(b'(') {
            return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter('(')));
        }
        w.advance(1);
        self.stack.push(Container::Constructor);
        self.state = ReaderState::ConstructorStart;
        Ok(Step::Token(Token {
            kind: TokenKind::StartConstructor,
            value: TokenValue::Str(name),
            quote: QuoteChar::None,
        }))
    }

    /// After a scalar or an End* token: decide between a separator, the
    /// enclosing container's end, a trailing comment, or EOF.
    fn parse_post_value<R: Read>(&mut self, w: &mut CharWindow<R>) -> Result<Step> {
        log::trace!("tokenizer: parse_post_value, stack depth {}", self.stack.len());
        loop {
            if !w.ensure(0, false)? {
                self.state = ReaderState::Finished;
                return Ok(Step::Continue);
            }
            match w.byte_at(0) {
                b' ' | b'\t' => w.advance(1),
                b'\r' | b'\n' => w.consume_newline()?,
                b'}' if self.stack.last() == Some(&Container::Object) => {
                    w.advance(1);
                    self.stack.pop();
                    self.after_value();
                    return Ok(Step::Token(Token::marker(TokenKind::EndObject)));
                }
                b']' if self.stack.last() == Some(&Container::Array) => {
                    w.advance(1);
                    self.stack.pop();
                    self.after_value();
                    return Ok(Step::Token(Token::marker(TokenKind::EndArray)));
                }
                b')' if self.in_constructor() => {
                    w.advance(1);
                    self.stack.pop();
                    self.after_value();
                    return Ok(Step::Token(Token::marker(TokenKind::EndConstructor)));
                }
                b'/' => return self.parse_comment(w),
                b',' => {
                    w.advance(1);
                    self.state = match self.stack.last() {
                        Some(Container::Object) => ReaderState::Object,
                        Some(Container::Array) => ReaderState::Array,
                        Some(Container::Constructor) => ReaderState::Constructor,
                        None => ReaderState::Start,
                    };
                    return Ok(Step::Continue);
                }
                other => {
                    return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter(other as char)));
                }
            }
        }
    }

    /// Once the top-level value has been fully read: only trailing
    /// whitespace, a trailing comment, or true EOF are acceptable from here.
    fn parse_finished<R: Read>(&mut self, w: &mut CharWindow<R>) -> Result<Step> {
        log::trace!("tokenizer: parse_finished");
        w.skip_whitespace()?;
        if !w.ensure(0, false)? {
            self.state = ReaderState::Complete;
            return Ok(Step::Eof);
        }
        if w.byte_at(0) == b'/' {
            return self.parse_comment(w);
        }
        Err(w.error_here(ReaderErrorKind::TrailingGarbage))
    }

    /// Scan a `/* ... */` block comment, starting with `w.byte_at(0) == '/'`.
    fn parse_comment<R: Read>(&mut self, w: &mut CharWindow<R>) -> Result<Step> {
        log::trace!("tokenizer: parse_comment");
        if w.peek_at(1, true)? != Some(b'*') {
            return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter('/')));
        }
        w.advance(2);
        w.shift_if_needed();
        let start = w.pos;
        loop {
            if !w.ensure(0, true)? {
                return Err(w.error_here(ReaderErrorKind::UnexpectedEndOfInput("a comment")));
            }
            match w.byte_at(0) {
                b'*' if w.peek_at(1, true)? == Some(b'/') => {
                    let text = w.slice_to_string(start, w.pos)?;
                    w.advance(2);
                    return Ok(Step::Token(Token {
                        kind: TokenKind::Comment,
                        value: TokenValue::Str(text),
                        quote: QuoteChar::None,
                    }));
                }
                b'\r' | b'\n' => w.consume_newline()?,
                _ => w.advance(1),
            }
        }
    }

    /// Wraps [`Tokenizer::scan_quoted`] with the value-position
    /// post-processing a quoted scalar needs: base64/bytes, `/Date(...)/ `
    /// upgrade, or a plain string.
    fn read_quoted_value<R: Read>(
        &mut self,
        w: &mut CharWindow<R>,
        mode: ReadMode,
        quote_byte: u8,
    ) -> Result<Step> {
        let (s, _origin) = self.scan_quoted(w, quote_byte)?;
        let quote = QuoteChar::from_byte(quote_byte);
        let token = if mode == ReadMode::ReadAsBytes {
            let bytes = decode_base64(&s).map_err(|e| w.error_here(ReaderErrorKind::InvalidValue(e)))?;
            Token {
                kind: TokenKind::Bytes,
                value: TokenValue::Bytes(bytes),
                quote,
            }
        } else if let Some(date) = parse_date_literal(&s, mode, |kind| w.error_here(kind))? {
            Token {
                kind: TokenKind::Date,
                value: TokenValue::Date(date),
                quote,
            }
        } else {
            Token {
                kind: TokenKind::String,
                value: TokenValue::Str(s),
                quote,
            }
        };
        self.after_value();
        Ok(Step::Token(token))
    }

    /// The core quoted-scalar scan shared by string values and property
    /// names. Precondition: `w.byte_at(0) == quote_byte`.
    pub(crate) fn scan_quoted<R: Read>(
        &mut self,
        w: &mut CharWindow<R>,
        quote_byte: u8,
    ) -> Result<(String, StringOrigin)> {
        w.advance(1);
        w.shift_if_needed();
        let initial_pos = w.pos;
        let mut last_write_pos = initial_pos;
        let mut has_escapes = false;

        loop {
            if !w.ensure(0, true)? {
                return Err(w.error_here(ReaderErrorKind::UnterminatedString));
            }
            let c = w.byte_at(0);
            if c == quote_byte {
                if !has_escapes {
                    let s = w.slice_to_string(initial_pos, w.pos)?;
                    w.advance(1);
                    return Ok((s, StringOrigin::Window));
                }
                let tail = w.slice_to_string(last_write_pos, w.pos)?;
                self.scratch.append_str(&tail);
                let s = self.scratch.take();
                w.advance(1);
                return Ok((s, StringOrigin::Buffer));
            }
            match c {
                b'\\' => {
                    if !has_escapes {
                        self.scratch.reset();
                        has_escapes = true;
                    }
                    let tail = w.slice_to_string(last_write_pos, w.pos)?;
                    self.scratch.append_str(&tail);
                    w.advance(1);
                    if !w.ensure(0, true)? {
                        return Err(w.error_here(ReaderErrorKind::UnterminatedString));
                    }
                    let decoded = self.decode_escape(w)?;
                    self.scratch.append_char(decoded);
                    last_write_pos = w.pos;
                }
                b'\r' | b'\n' => w.consume_newline()?,
                _ => w.advance(1),
            }
        }
    }

    /// Decode one escape sequence. Precondition: `w.byte_at(0)` is the
    /// character right after the backslash.
    fn decode_escape<R: Read>(&mut self, w: &mut CharWindow<R>) -> Result<char> {
        let esc = w.byte_at(0);
        match esc {
            b'b' => {
                w.advance(1);
                Ok('\u{8}')
            }
            b't' => {
                w.advance(1);
                Ok('\t')
            }
            b'n' => {
                w.advance(1);
                Ok('\n')
            }
            b'f' => {
                w.advance(1);
                Ok('\u{c}')
            }
            b'r' => {
                w.advance(1);
                Ok('\r')
            }
            b'\\' => {
                w.advance(1);
                Ok('\\')
            }
            b'"' => {
                w.advance(1);
                Ok('"')
            }
            b'\'' => {
                w.advance(1);
                Ok('\'')
            }
            b'/' => {
                w.advance(1);
                Ok('/')
            }
            b'u' => {
                w.advance(1);
                let high = self.read_hex4(w)?;
                if (0xD800..=0xDBFF).contains(&high) {
                    if w.peek_at(0, true)? != Some(b'\\') || w.peek_at(1, true)? != Some(b'u') {
                        return Err(w.error_here(ReaderErrorKind::BadEscape(format!(
                            "\\u{high:04x} is an unpaired high surrogate"
                        ))));
                    }
                    w.advance(2);
                    let low = self.read_hex4(w)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(w.error_here(ReaderErrorKind::BadEscape(format!(
                            "\\u{low:04x} is not a low surrogate"
                        ))));
                    }
                    let cp = 0x10000 + (((high - 0xD800) as u32) << 10) + (low - 0xDC00) as u32;
                    char::from_u32(cp)
                        .ok_or_else(|| w.error_here(ReaderErrorKind::BadEscape(format!("U+{cp:x}"))))
                } else if (0xDC00..=0xDFFF).contains(&high) {
                    Err(w.error_here(ReaderErrorKind::BadEscape(format!(
                        "\\u{high:04x} is an unpaired low surrogate"
                    ))))
                } else {
                    char::from_u32(high as u32)
                        .ok_or_else(|| w.error_here(ReaderErrorKind::BadEscape(format!("U+{high:x}"))))
                }
            }
            other => Err(w.error_here(ReaderErrorKind::BadEscape((other as char).to_string()))),
        }
    }

    fn read_hex4<R: Read>(&mut self, w: &mut CharWindow<R>) -> Result<u16> {
        for i in 0..4 {
            if !w.ensure(i, true)? {
                return Err(w.error_here(ReaderErrorKind::UnterminatedString));
            }
        }
        let digits = w.slice_bytes(w.pos, w.pos + 4);
        let text = std::str::from_utf8(digits)
            .map_err(|_| w.error_here(ReaderErrorKind::BadEscape("invalid hex digits".into())))?;
        let value = u16::from_str_radix(text, 16)
            .map_err(|_| w.error_here(ReaderErrorKind::BadEscape(text.into())))?;
        w.advance(4);
        Ok(value)
    }

    /// Scan a decimal, hex, or octal number literal and classify/parse it
    /// per the active read-mode hint.
    fn parse_number<R: Read>(&mut self, w: &mut CharWindow<R>, mode: ReadMode) -> Result<Step> {
        log::trace!("tokenizer: parse_number");
        w.shift_if_needed();
        let start = w.pos;
        loop {
            if !w.ensure(0, true)? {
                break;
            }
            match w.byte_at(0) {
                b'0'..=b'9' | b'.' | b'+' | b'-' | b'a'..=b'f' | b'A'..=b'F' | b'x' | b'X' => {
                    w.advance(1)
                }
                _ => break,
            }
        }
        let text = w.slice_to_string(start, w.pos)?;
        let category = classify_number(&text);
        let (kind, value) = finalize_number(&text, category, mode)
            .map_err(|msg| w.error_here(ReaderErrorKind::IntegerOverflow(msg)))?;
        self.after_value();
        Ok(Step::Token(Token { kind, value, quote: QuoteChar::None }))
    }

    /// Reset container stack/state for a fresh top-level value, used by
    /// `JsonTextReader::close`.
    pub(crate) fn reset_for_close(&mut self) {
        self.stack.clear();
        self.scratch.reset();
        self.state = ReaderState::Closed;
    }
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

impl Tokenizer {
    /// Match a literal word (`true`, `null`, `NaN`, ...), requiring that
    /// whatever follows it is a legal separator rather than more identifier
    /// text.
    fn match_word<R: Read>(&mut self, w: &mut CharWindow<R>, word: &str) -> Result<()> {
        let bytes = word.as_bytes();
        for (i, &expected) in bytes.iter().enumerate() {
            if !w.ensure(i, true)? || w.byte_at(i) != expected {
                let found = w.peek_at(i, true)?.map(|b| b as char).unwrap_or('\0');
                return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter(found)));
            }
        }
        let sep_ok = match w.peek_at(bytes.len(), true)? {
            None => true,
            Some(b' ' | b'\t' | b'\r' | b'\n' | b'}' | b']' | b',') => true,
            Some(b')') => self.in_constructor(),
            Some(b'/') => w.peek_at(bytes.len() + 1, true)? == Some(b'*'),
            Some(_) => false,
        };
        if !sep_ok {
            return Err(w.error_here(ReaderErrorKind::UnexpectedCharacter(
                w.byte_at(bytes.len()) as char,
            )));
        }
        w.advance(bytes.len());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum NumberCategory {
    SingleDigit,
    Hex,
    Octal,
    Float,
    Integer,
}

fn classify_number(text: &str) -> NumberCategory {
    let bytes = text.as_bytes();
    if bytes.len() == 1 && bytes[0].is_ascii_digit() {
        return NumberCategory::SingleDigit;
    }
    if bytes[0] == b'0' && bytes.len() > 1 && !matches!(bytes[1], b'.' | b'e' | b'E') {
        if matches!(bytes[1], b'x' | b'X') {
            return NumberCategory::Hex;
        }
        return NumberCategory::Octal;
    }
    if text.contains('.') || text.contains('e') || text.contains('E') {
        NumberCategory::Float
    } else {
        NumberCategory::Integer
    }
}

/// Manual digit-by-digit octal parse. Inherited quirk: digits `8`/`9` are not
/// rejected, just folded into the running value arithmetically. Bytes that
/// aren't ASCII digits at all (the lexeme scanner accepts `+`/`-`/`e`/`.` in
/// the same sweep that classifies a leading-zero run as octal) are rejected
/// with a typed error rather than underflowing the `u8` subtraction below.
fn parse_octal_quirky(digits: &str) -> std::result::Result<i64, String> {
    let mut value: i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return Err(digits.to_string());
        }
        value = value.wrapping_mul(8).wrapping_add(b as i64 - b'0' as i64);
    }
    Ok(value)
}

fn finalize_number(
    text: &str,
    category: NumberCategory,
    mode: ReadMode,
) -> std::result::Result<(TokenKind, TokenValue), String> {
    use lexical_parse_float::FromLexical as _;
    use lexical_parse_integer::FromLexical as _;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    match mode {
        ReadMode::ReadAsInt32 => {
            let v: i32 = match category {
                NumberCategory::SingleDigit => (text.as_bytes()[0] - b'0') as i32,
                NumberCategory::Hex => {
                    i64::from_str_radix(&text[2..], 16).map_err(|_| text.to_string())? as i32
                }
                NumberCategory::Octal => {
                    parse_octal_quirky(&text[1..]).map_err(|_| text.to_string())? as i32
                }
                NumberCategory::Integer => {
                    i32::from_lexical(text.as_bytes()).map_err(|_| text.to_string())?
                }
                NumberCategory::Float => {
                    let f = f64::from_lexical(text.as_bytes()).map_err(|_| text.to_string())?;
                    if !f.is_finite() || f < i32::MIN as f64 || f > i32::MAX as f64 {
                        return Err(text.to_string());
                    }
                    f as i32
                }
            };
            Ok((TokenKind::Integer, TokenValue::Integer(v as i64)))
        }
        ReadMode::ReadAsDecimal => {
            let d = match category {
                NumberCategory::SingleDigit => Decimal::from(text.as_bytes()[0] - b'0'),
                NumberCategory::Hex => Decimal::from(
                    i64::from_str_radix(&text[2..], 16).map_err(|_| text.to_string())?,
                ),
                NumberCategory::Octal => Decimal::from(
                    parse_octal_quirky(&text[1..]).map_err(|_| text.to_string())?,
                ),
                NumberCategory::Float => Decimal::from_scientific(text)
                    .or_else(|_| Decimal::from_str(text))
                    .map_err(|_| text.to_string())?,
                NumberCategory::Integer => {
                    Decimal::from_str(text).map_err(|_| text.to_string())?
                }
            };
            Ok((TokenKind::Float, TokenValue::Decimal(d)))
        }
        _ => match category {
            NumberCategory::SingleDigit => Ok((
                TokenKind::Integer,
                TokenValue::Integer((text.as_bytes()[0] - b'0') as i64),
            )),
            NumberCategory::Hex => Ok((
                TokenKind::Integer,
                TokenValue::Integer(
                    i64::from_str_radix(&text[2..], 16).map_err(|_| text.to_string())?,
                ),
            )),
            NumberCategory::Octal => Ok((
                TokenKind::Integer,
                TokenValue::Integer(parse_octal_quirky(&text[1..]).map_err(|_| text.to_string())?),
            )),
            NumberCategory::Float => Ok((
                TokenKind::Float,
                TokenValue::Float(f64::from_lexical(text.as_bytes()).map_err(|_| text.to_string())?),
            )),
            NumberCategory::Integer => Ok((
                TokenKind::Integer,
                TokenValue::Integer(
                    i64::from_lexical(text.as_bytes()).map_err(|_| text.to_string())?,
                ),
            )),
        },
    }
}

fn decode_base64(s: &str) -> std::result::Result<Vec<u8>, String> {
    use base64::Engine as _;
    if s.is_empty() {
        return Ok(Vec::new());
    }
    base64::engine::general_purpose::STANDARD
        .decode(s.as_bytes())
        .map_err(|e| format!("invalid base64: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_window::CharWindow;
    use std::io::Cursor;

    fn window(s: &str) -> CharWindow<Cursor<Vec<u8>>> {
        CharWindow::new(Cursor::new(s.as_bytes().to_vec()))
    }

    fn collect_tokens(input: &str) -> Vec<Token> {
        let mut w = window(input);
        let mut t = Tokenizer::new();
        let mut out = Vec::new();
        loop {
            match t.step(&mut w, ReadMode::Read).unwrap() {
                Step::Token(tok) => out.push(tok),
                Step::Continue => continue,
                Step::Eof => break,
            }
        }
        out
    }

    #[test]
    fn simple_object() {
        let toks = collect_tokens(r#"{"a":1,"b":[true,null]}"#);
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
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
    }

    #[test]
    fn unquoted_property_and_hex_integer() {
        let toks = collect_tokens("{a:'x\n',b:0xFF}");
        assert_eq!(toks[1].quote, QuoteChar::None);
        assert_eq!(toks[2].value, TokenValue::Str("x\n".into()));
        assert_eq!(toks[4].value, TokenValue::Integer(255));
    }

    #[test]
    fn nan_and_infinities() {
        let toks = collect_tokens("[NaN,-Infinity,1.5e2]");
        match &toks[1].value {
            TokenValue::Float(f) => assert!(f.is_nan()),
            other => panic!("expected float, got {other:?}"),
        }
        assert_eq!(toks[2].value, TokenValue::Float(f64::NEG_INFINITY));
        assert_eq!(toks[3].value, TokenValue::Float(150.0));
    }

    #[test]
    fn constructor_syntax() {
        let toks = collect_tokens("new Date(1234567890123)");
        assert_eq!(toks[0].kind, TokenKind::StartConstructor);
        assert_eq!(toks[0].value, TokenValue::Str("Date".into()));
        assert_eq!(toks[1].value, TokenValue::Integer(1234567890123));
        assert_eq!(toks[2].kind, TokenKind::EndConstructor);
    }

    #[test]
    fn comment_and_undefined_hole() {
        let toks = collect_tokens("[/*c*/ 1 ,, 2]");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
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
    }

    #[test]
    fn unterminated_object_is_an_error() {
        let mut w = window("{");
        let mut t = Tokenizer::new();
        assert!(matches!(
            t.step(&mut w, ReadMode::Read).unwrap(),
            Step::Token(Token { kind: TokenKind::StartObject, .. })
        ));
        let err = t.step(&mut w, ReadMode::Read).unwrap_err();
        assert!(matches!(err.kind, ReaderErrorKind::UnexpectedEndOfInput(_)));
        assert_eq!(err.line_number, 1);
    }

    #[test]
    fn octal_quirk_does_not_validate_digits() {
        // documented inherited quirk: 0189 is accepted, treated arithmetically
        assert_eq!(parse_octal_quirky("189").unwrap(), 1 * 64 + 8 * 8 + 9);
    }

    #[test]
    fn octal_quirk_rejects_non_digit_bytes_instead_of_underflowing() {
        // `0+5` scans as one lexeme (parse_number's charset includes `+`/`-`)
        // and classifies as Octal; the non-digit byte must be a typed error,
        // not a `u8` underflow panic.
        assert!(parse_octal_quirky("+5").is_err());
        let toks_err = {
            let mut w = window("0+5");
            let mut t = Tokenizer::new();
            t.step(&mut w, ReadMode::Read)
        };
        assert!(matches!(toks_err, Err(e) if matches!(e.kind, ReaderErrorKind::IntegerOverflow(_))));
    }
}
