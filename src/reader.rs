//! The public reader type, tying the window, tokenizer, and typed adapters
//! together, and exposing the caller-facing surface.

use std::io::{Cursor, Read};

use crate::char_window::{CharWindow, DEFAULT_CAPACITY};
use crate::error::{ReaderError, ReaderErrorKind, Result};
use crate::mode::ReadMode;
use crate::span::LineInfo;
use crate::state::ReaderState;
use crate::token::{Token, TokenKind, TokenValue};
use crate::tokenizer::{Step, Tokenizer};

/// A streaming, forward-only reader over a JSON-superset byte stream.
///
/// Call [`read`](Self::read) (or one of the typed `read_as_*` adapters)
/// repeatedly; each call advances past exactly one token, available
/// afterwards via [`current_token`](Self::current_token).
pub struct JsonTextReader<R> {
    window: CharWindow<R>,
    tokenizer: Tokenizer,
    current: Token,
    /// Configuration: whether `close` propagates to the upstream source.
    /// Rust's ownership model makes this mostly a documentation knob — see
    /// `close`'s doc comment.
    close_input: bool,
}

impl<R: Read> JsonTextReader<R> {
    /// Build a reader over any `std::io::Read` source, with the default
    /// ~4 KiB initial window capacity.
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, DEFAULT_CAPACITY)
    }

    /// Build a reader with an explicit initial window capacity.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            window: CharWindow::with_capacity(source, capacity),
            tokenizer: Tokenizer::new(),
            current: Token::marker(TokenKind::None),
            close_input: true,
        }
    }

    /// Whether `close` should also drop/close the upstream source. Defaults
    /// to `true`.
    pub fn with_close_input(mut self, close_input: bool) -> Self {
        self.close_input = close_input;
        self
    }

    /// The most recently produced token. Before the first successful `read`,
    /// this is a `None`-kind marker token.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Always `true` for this reader: line/column tracking is unconditional.
    pub fn has_line_info(&self) -> bool {
        true
    }

    /// 1-based line number of the most recently consumed byte.
    pub fn line_number(&self) -> u64 {
        self.window.line_number
    }

    /// 0-based column of the most recently consumed byte.
    pub fn line_position(&self) -> u64 {
        self.window.line_position()
    }

    /// [`line_number`](Self::line_number) and [`line_position`](Self::line_position) together.
    pub fn line_info(&self) -> LineInfo {
        LineInfo {
            line_number: self.line_number(),
            line_position: self.line_position(),
        }
    }

    /// Advance to the next token, or return `false` at a clean end of
    /// input. Unlike the typed adapters, comments are surfaced like any
    /// other token.
    pub fn read(&mut self) -> Result<bool> {
        self.ensure_open()?;
        match self.step_once(ReadMode::Read)? {
            Some(tok) => {
                self.current = tok;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Transition to `Closed`. Further reads return an `IllegalState`
    /// error. Because `R` is owned (not borrowed) by this
    /// reader, Rust's normal drop glue already closes the upstream source
    /// when the reader (or the `R` returned by [`into_inner`](Self::into_inner))
    /// goes out of scope; `close_input` only controls whether `into_inner`
    /// can still be used to recover it afterwards.
    pub fn close(&mut self) {
        self.tokenizer.reset_for_close();
    }

    /// Recover the upstream source, consuming the reader.
    pub fn into_inner(self) -> R {
        self.window.into_inner()
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if matches!(self.tokenizer.state, ReaderState::Closed) {
            return Err(ReaderError {
                kind: ReaderErrorKind::IllegalState("the reader is closed"),
                span: None,
                line_number: self.window.line_number,
                line_position: self.window.line_position(),
                source_code: None,
            });
        }
        Ok(())
    }

    /// One raw step through the tokenizer; `Step::Continue` is looped over
    /// internally since it carries no token to surface.
    pub(crate) fn step_once(&mut self, mode: ReadMode) -> Result<Option<Token>> {
        loop {
            match self.tokenizer.step(&mut self.window, mode) {
                Ok(Step::Token(tok)) => return Ok(Some(tok)),
                Ok(Step::Continue) => continue,
                Ok(Step::Eof) => return Ok(None),
                Err(e) => {
                    self.tokenizer.state = ReaderState::Error;
                    return Err(e);
                }
            }
        }
    }

    /// Drives `step_once` under `mode`, transparently skipping `Comment`
    /// tokens, as all four typed adapters require. Updates
    /// `current` as it goes so comments remain visible via
    /// [`current_token`](Self::current_token) even though they're skipped
    /// for coercion purposes.
    pub(crate) fn read_skip_comments(&mut self, mode: ReadMode) -> Result<Option<Token>> {
        self.ensure_open()?;
        loop {
            match self.step_once(mode)? {
                Some(tok) if tok.kind == TokenKind::Comment => {
                    self.current = tok;
                }
                Some(tok) => {
                    self.current = tok.clone();
                    return Ok(Some(tok));
                }
                None => return Ok(None),
            }
        }
    }

    pub(crate) fn rewrite_current(&mut self, kind: TokenKind, value: TokenValue) {
        self.current.kind = kind;
        self.current.value = value;
    }

    pub(crate) fn coercion_error(&self, msg: String) -> ReaderError {
        ReaderError {
            kind: ReaderErrorKind::CoercionFailure(msg),
            span: None,
            line_number: self.line_number(),
            line_position: self.line_position(),
            source_code: None,
        }
    }

    pub(crate) fn unexpected_token_error(&self, msg: String) -> ReaderError {
        ReaderError {
            kind: ReaderErrorKind::UnexpectedToken(msg),
            span: None,
            line_number: self.line_number(),
            line_position: self.line_position(),
            source_code: None,
        }
    }
}

impl JsonTextReader<Cursor<Vec<u8>>> {
    /// Convenience constructor for in-memory parsing.
    pub fn from_str(s: &str) -> Self {
        JsonTextReader::new(Cursor::new(s.as_bytes().to_vec()))
    }
}
