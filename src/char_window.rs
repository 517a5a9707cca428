//! The sliding byte window that feeds the tokenizer.
//!
//! # Design: shift-and-grow, not grow-only
//!
//! Unlike a buffer that only ever grows, this window actively compacts
//! itself: once the unconsumed tail drops to 10% of capacity it shifts
//! `[pos..used)` back to offset 0 so the window doesn't creep toward its
//! capacity on every token. Growth only kicks in when a single in-flight
//! scalar (a long string, a long number) needs more room than compaction can
//! free. The tradeoff is one `copy_within` per shift versus letting the
//! window grow unboundedly for documents with many short tokens.
//!
//! Two refill policies, chosen by the caller per `ensure` call:
//! - `append = true`: never shift. Used while a byte range already handed out
//!   (a string's `initial_pos`, say) must stay valid across the refill.
//! - `append = false`: shift (and grow only if shifting still isn't enough).
//!   Used at token boundaries, where no earlier offset needs to survive.

use std::io::Read;

use crate::error::{ReaderError, ReaderErrorKind};
use crate::span::Span;

/// Initial window capacity. Large enough that most documents never need a
/// grow, small enough that a flood of tiny documents doesn't waste memory.
pub(crate) const DEFAULT_CAPACITY: usize = 4 * 1024;

pub(crate) struct CharWindow<R> {
    source: R,
    buf: Vec<u8>,
    /// Number of valid bytes in `buf`, i.e. `buf[0..used]` is real content and
    /// `buf[used]` is the `\0` sentinel.
    used: usize,
    /// Next byte to consume.
    pub(crate) pos: usize,
    /// Absolute stream offset of the start of the current line, for
    /// `line_position`. Stored as an absolute offset (not a window-relative
    /// index) so a shift never needs to adjust it: `pos` moves, but the
    /// line's starting point in the stream does not.
    line_start_abs: usize,
    /// 1-based line number.
    pub(crate) line_number: u64,
    /// Absolute stream offset of `buf[0]`, so `Span`s survive shifts/grows.
    base_offset: usize,
    is_end_of_file: bool,
}

impl<R: Read> CharWindow<R> {
    pub(crate) fn new(source: R) -> Self {
        Self::with_capacity(source, DEFAULT_CAPACITY)
    }

    pub(crate) fn with_capacity(source: R, capacity: usize) -> Self {
        let mut buf = vec![0u8; capacity.max(1)];
        buf[0] = 0;
        Self {
            source,
            buf,
            used: 0,
            pos: 0,
            line_start_abs: 0,
            line_number: 1,
            base_offset: 0,
            is_end_of_file: false,
        }
    }

    /// Is byte `pos + relative` available? If not, try to read more.
    /// Returns whether the byte is now available.
    pub(crate) fn ensure(&mut self, relative: usize, append: bool) -> crate::error::Result<bool> {
        if self.pos + relative < self.used {
            return Ok(true);
        }
        self.read_data(append, relative + 1)?;
        Ok(self.pos + relative < self.used)
    }

    /// Make room for at least `required` more bytes past `used`, shifting,
    /// growing, or both as needed, then pull more bytes from the source.
    fn read_data(&mut self, append: bool, required: usize) -> crate::error::Result<usize> {
        if self.is_end_of_file {
            return Ok(0);
        }
        let capacity = self.buf.len();
        if self.used + required >= capacity.saturating_sub(1) {
            if append {
                let new_capacity = (capacity * 2).max(self.used + required + 1);
                log::trace!("char_window: growing {capacity} -> {new_capacity} bytes (append)");
                self.buf.resize(new_capacity, 0);
            } else {
                let remaining = self.used - self.pos;
                if remaining + required + 1 >= capacity {
                    let new_capacity = remaining + required + 1;
                    log::trace!(
                        "char_window: compacting and growing {capacity} -> {new_capacity} bytes"
                    );
                    let mut new_buf = vec![0u8; new_capacity];
                    new_buf[..remaining].copy_from_slice(&self.buf[self.pos..self.used]);
                    self.buf = new_buf;
                } else {
                    log::trace!("char_window: shifting {remaining} bytes to offset 0");
                    self.buf.copy_within(self.pos..self.used, 0);
                }
                self.base_offset += self.pos;
                self.pos = 0;
                self.used = remaining;
            }
        }
        let avail_end = self.buf.len() - 1;
        let n = self
            .source
            .read(&mut self.buf[self.used..avail_end])
            .map_err(|e| self.error_here(ReaderErrorKind::Io(e.to_string())))?;
        self.used += n;
        self.buf[self.used] = 0;
        if n == 0 {
            self.is_end_of_file = true;
        }
        Ok(n)
    }

    /// Compact without growing, invoked before starting a scalar of
    /// unbounded length so it has as much room as possible to scan into.
    pub(crate) fn shift_if_needed(&mut self) {
        let capacity = self.buf.len();
        if capacity == 0 {
            return;
        }
        if (capacity - self.pos) as f64 <= 0.10 * capacity as f64 {
            let remaining = self.used - self.pos;
            log::trace!("char_window: proactive shift_if_needed, {remaining} bytes remaining");
            self.buf.copy_within(self.pos..self.used, 0);
            self.base_offset += self.pos;
            self.pos = 0;
            self.used = remaining;
            self.buf[self.used] = 0;
        }
    }

    pub(crate) fn byte_at(&self, relative: usize) -> u8 {
        self.buf[self.pos + relative]
    }

    /// Peek at `pos + relative`, refilling if necessary. `None` on EOF.
    pub(crate) fn peek_at(
        &mut self,
        relative: usize,
        append: bool,
    ) -> crate::error::Result<Option<u8>> {
        if self.ensure(relative, append)? {
            Ok(Some(self.byte_at(relative)))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Consume a CR or LF at `pos` as a single logical newline, updating line
    /// tracking. Precondition: `byte_at(0)` is `\r` or `\n`.
    pub(crate) fn consume_newline(&mut self) -> crate::error::Result<()> {
        let first = self.byte_at(0);
        self.pos += 1;
        if first == b'\r' && self.ensure(0, true)? && self.byte_at(0) == b'\n' {
            self.pos += 1;
        }
        self.line_number += 1;
        self.line_start_abs = self.absolute_offset();
        Ok(())
    }

    /// Skip ASCII space/tab/CR/LF.
    pub(crate) fn skip_whitespace(&mut self) -> crate::error::Result<()> {
        loop {
            if !self.ensure(0, false)? {
                return Ok(());
            }
            match self.byte_at(0) {
                b' ' | b'\t' => self.pos += 1,
                b'\r' | b'\n' => self.consume_newline()?,
                _ => return Ok(()),
            }
        }
    }

    /// Validate and copy `buf[start..end]` (window-relative indices) to an
    /// owned `String`.
    pub(crate) fn slice_to_string(&self, start: usize, end: usize) -> crate::error::Result<String> {
        std::str::from_utf8(&self.buf[start..end])
            .map(str::to_owned)
            .map_err(|_| self.error_here(ReaderErrorKind::InvalidValue("invalid UTF-8".into())))
    }

    pub(crate) fn slice_bytes(&self, start: usize, end: usize) -> &[u8] {
        &self.buf[start..end]
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.is_end_of_file && self.pos >= self.used
    }

    pub(crate) fn line_position(&self) -> u64 {
        (self.absolute_offset() - self.line_start_abs) as u64
    }

    pub(crate) fn absolute_offset(&self) -> usize {
        self.base_offset + self.pos
    }

    pub(crate) fn into_inner(self) -> R {
        self.source
    }

    pub(crate) fn error_here(&self, kind: ReaderErrorKind) -> ReaderError {
        ReaderError {
            kind,
            span: Some(Span::new(self.absolute_offset(), 1)),
            line_number: self.line_number,
            line_position: self.line_position(),
            source_code: None,
        }
    }

    pub(crate) fn error_span(&self, kind: ReaderErrorKind, start_abs: usize) -> ReaderError {
        let end = self.absolute_offset();
        ReaderError {
            kind,
            span: Some(Span::new(start_abs, end.saturating_sub(start_abs).max(1))),
            line_number: self.line_number,
            line_position: self.line_position(),
            source_code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ensure_reads_across_refills() {
        let mut w = CharWindow::with_capacity(Cursor::new(b"hello".to_vec()), 4);
        assert!(w.ensure(4, true).unwrap());
        assert_eq!(w.byte_at(4), b'o');
    }

    #[test]
    fn ensure_reports_eof() {
        let mut w = CharWindow::with_capacity(Cursor::new(b"hi".to_vec()), 8);
        assert!(w.ensure(1, true).unwrap());
        assert!(!w.ensure(10, true).unwrap());
        assert!(w.is_eof());
    }

    #[test]
    fn shift_if_needed_preserves_content_and_updates_base_offset() {
        let mut w = CharWindow::with_capacity(Cursor::new(b"abcdefghij".to_vec()), 10);
        w.ensure(8, true).unwrap();
        w.advance(9);
        w.shift_if_needed();
        assert_eq!(w.absolute_offset(), 9);
        assert!(w.ensure(0, true).unwrap());
        assert_eq!(w.byte_at(0), b'j');
    }

    #[test]
    fn consume_newline_handles_crlf_as_one_line() {
        let mut w = CharWindow::with_capacity(Cursor::new(b"a\r\nb".to_vec()), 16);
        w.ensure(3, true).unwrap();
        w.advance(1);
        assert_eq!(w.byte_at(0), b'\r');
        w.consume_newline().unwrap();
        assert_eq!(w.line_number, 2);
        assert_eq!(w.byte_at(0), b'b');
    }

    #[test]
    fn line_position_survives_a_shift_mid_line() {
        // No newline anywhere: everything is on line 1, so `line_start_abs`
        // stays 0 for the whole scan. A shift must not reset it to the new
        // `pos` — the column is still measured from the start of the line,
        // not from the start of the window.
        let data = vec![b'x'; 20];
        let mut w = CharWindow::with_capacity(Cursor::new(data), 10);
        for _ in 0..9 {
            assert!(w.ensure(0, true).unwrap());
            w.advance(1);
        }
        w.shift_if_needed();
        assert!(w.ensure(0, true).unwrap());
        assert_eq!(w.absolute_offset(), 9);
        assert_eq!(w.line_position(), 9);
    }
}
