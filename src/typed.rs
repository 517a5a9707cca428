//! Typed read adapters: `read_as_int32`, `read_as_decimal`, `read_as_bytes`,
//! `read_as_date_time_offset`. Each sets the read-mode hint for the
//! duration of one call, drives the tokenizer (skipping comments), and
//! coerces the resulting token.

use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::date::parse_date_literal;
use crate::error::Result;
use crate::mode::ReadMode;
use crate::reader::JsonTextReader;
use crate::token::{TokenKind, TokenValue};

impl<R: Read> JsonTextReader<R> {
    /// Read the next non-comment token, coerced to a signed 32-bit integer.
    /// Returns `None` at a `null` or at the end of an array.
    pub fn read_as_int32(&mut self) -> Result<Option<i32>> {
        let Some(tok) = self.read_skip_comments(ReadMode::ReadAsInt32)? else {
            return Ok(None);
        };
        match tok.kind {
            TokenKind::Integer => {
                let TokenValue::Integer(v) = tok.value else {
                    unreachable!()
                };
                Ok(Some(v as i32))
            }
            TokenKind::String => {
                let TokenValue::Str(s) = &tok.value else {
                    unreachable!()
                };
                let v: i32 = s
                    .trim()
                    .parse()
                    .map_err(|_| self.coercion_error(format!("'{s}' is not an int32")))?;
                self.rewrite_current(TokenKind::Integer, TokenValue::Integer(v as i64));
                Ok(Some(v))
            }
            TokenKind::Null | TokenKind::EndArray => Ok(None),
            other => Err(self.unexpected_token_error(format!("{other:?} is not an integer"))),
        }
    }

    /// Read the next non-comment token, coerced to an arbitrary-precision
    /// decimal. Returns `None` at a `null` or at the end of an array.
    pub fn read_as_decimal(&mut self) -> Result<Option<Decimal>> {
        let Some(tok) = self.read_skip_comments(ReadMode::ReadAsDecimal)? else {
            return Ok(None);
        };
        match tok.kind {
            TokenKind::Float => {
                let TokenValue::Decimal(d) = tok.value else {
                    unreachable!()
                };
                Ok(Some(d))
            }
            TokenKind::String => {
                let TokenValue::Str(s) = &tok.value else {
                    unreachable!()
                };
                let d = Decimal::from_scientific(s.trim())
                    .or_else(|_| Decimal::from_str(s.trim()))
                    .map_err(|_| self.coercion_error(format!("'{s}' is not a decimal")))?;
                self.rewrite_current(TokenKind::Float, TokenValue::Decimal(d));
                Ok(Some(d))
            }
            TokenKind::Null | TokenKind::EndArray => Ok(None),
            other => Err(self.unexpected_token_error(format!("{other:?} is not a decimal"))),
        }
    }

    /// Read the next non-comment token, coerced to an instant with an
    /// offset. Returns `None` at a `null` or at the end of an array.
    pub fn read_as_date_time_offset(&mut self) -> Result<Option<DateTime<FixedOffset>>> {
        let Some(tok) = self.read_skip_comments(ReadMode::ReadAsDateTimeOffset)? else {
            return Ok(None);
        };
        match tok.kind {
            TokenKind::Date => {
                let TokenValue::Date(date) = &tok.value else {
                    unreachable!()
                };
                Ok(Some(date.to_fixed_offset()))
            }
            TokenKind::String => {
                let TokenValue::Str(s) = &tok.value else {
                    unreachable!()
                };
                match parse_date_literal(s, ReadMode::ReadAsDateTimeOffset, |kind| {
                    crate::error::ReaderError {
                        kind,
                        span: None,
                        line_number: 0,
                        line_position: 0,
                        source_code: None,
                    }
                })? {
                    Some(date) => {
                        let fixed = date.to_fixed_offset();
                        self.rewrite_current(TokenKind::Date, TokenValue::Date(date));
                        Ok(Some(fixed))
                    }
                    None => Err(self.coercion_error(format!("'{s}' is not a date literal"))),
                }
            }
            TokenKind::Null | TokenKind::EndArray => Ok(None),
            other => Err(self.unexpected_token_error(format!("{other:?} is not a date"))),
        }
    }

    /// Read the next non-comment token, decoded to a binary blob — from a
    /// base64 string, a JSON array of byte-range integers, or a
    /// `$type`/`$value` wrapper object. Returns `None` at a `null` or at the
    /// end of an array.
    pub fn read_as_bytes(&mut self) -> Result<Option<Vec<u8>>> {
        let Some(tok) = self.read_skip_comments(ReadMode::ReadAsBytes)? else {
            return Ok(None);
        };
        match tok.kind {
            TokenKind::Bytes => {
                let TokenValue::Bytes(b) = tok.value else {
                    unreachable!()
                };
                Ok(Some(b))
            }
            TokenKind::Null | TokenKind::EndArray => Ok(None),
            TokenKind::StartArray => self.read_bytes_from_int_array(),
            TokenKind::StartObject => self.read_bytes_from_wrapper_object(),
            other => Err(self.unexpected_token_error(format!("{other:?} is not bytes"))),
        }
    }

    /// Accumulate a JSON array of integers 0-255 into a byte vector, element
    /// by element, until `EndArray`.
    fn read_bytes_from_int_array(&mut self) -> Result<Option<Vec<u8>>> {
        let mut bytes = Vec::new();
        loop {
            let Some(tok) = self.read_skip_comments(ReadMode::ReadAsInt32)? else {
                return Err(self.unexpected_token_error("unterminated byte array".into()));
            };
            match tok.kind {
                TokenKind::EndArray => break,
                TokenKind::Integer => {
                    let TokenValue::Integer(v) = tok.value else {
                        unreachable!()
                    };
                    if !(0..=255).contains(&v) {
                        return Err(self.coercion_error(format!("{v} is out of range for a byte")));
                    }
                    bytes.push(v as u8);
                }
                other => {
                    return Err(self.unexpected_token_error(format!(
                        "{other:?} is not valid inside a byte array"
                    )));
                }
            }
        }
        Ok(Some(bytes))
    }

    /// Unwrap a `{"$type": "System.Byte[]...", "$value": "<base64>"}` object
    /// into the decoded byte vector. Inlined as a straight-line sequence of
    /// reads rather than a recursive call back into `read_as_bytes`, so
    /// there's no risk of re-entering this same wrapper-unwrapping logic.
    fn read_bytes_from_wrapper_object(&mut self) -> Result<Option<Vec<u8>>> {
        let type_name_tok = self
            .read_skip_comments(ReadMode::Read)?
            .ok_or_else(|| self.unexpected_token_error("expected '$type' property".into()))?;
        let TokenValue::Str(prop) = &type_name_tok.value else {
            return Err(self.unexpected_token_error("expected a property name".into()));
        };
        if prop != "$type" {
            return Err(self.unexpected_token_error(format!("expected '$type', found '{prop}'")));
        }

        let type_value_tok = self
            .read_skip_comments(ReadMode::Read)?
            .ok_or_else(|| self.unexpected_token_error("expected '$type' value".into()))?;
        let TokenValue::Str(type_value) = &type_value_tok.value else {
            return Err(self.unexpected_token_error("'$type' value must be a string".into()));
        };
        if !type_value.starts_with("System.Byte[]") {
            return Err(self.coercion_error(format!("'{type_value}' is not a byte array type")));
        }

        let value_name_tok = self
            .read_skip_comments(ReadMode::Read)?
            .ok_or_else(|| self.unexpected_token_error("expected '$value' property".into()))?;
        let TokenValue::Str(prop) = &value_name_tok.value else {
            return Err(self.unexpected_token_error("expected a property name".into()));
        };
        if prop != "$value" {
            return Err(self.unexpected_token_error(format!("expected '$value', found '{prop}'")));
        }

        let data_tok = self
            .read_skip_comments(ReadMode::ReadAsBytes)?
            .ok_or_else(|| self.unexpected_token_error("expected '$value' data".into()))?;
        let TokenKind::Bytes = data_tok.kind else {
            return Err(self.unexpected_token_error("'$value' must be a base64 string".into()));
        };
        let TokenValue::Bytes(bytes) = data_tok.value else {
            unreachable!()
        };

        let end_tok = self
            .read_skip_comments(ReadMode::Read)?
            .ok_or_else(|| self.unexpected_token_error("expected closing '}'".into()))?;
        if end_tok.kind != TokenKind::EndObject {
            return Err(self.unexpected_token_error("expected closing '}' after '$value'".into()));
        }

        Ok(Some(bytes))
    }
}
