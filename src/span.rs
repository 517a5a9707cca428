//! Source location tracking, independent of where a byte currently sits in
//! the sliding window.

/// A byte-offset span within the full scanned input.
///
/// Unlike a raw index into the [`CharWindow`](crate::char_window::CharWindow)'s
/// buffer, a `Span`'s `offset` survives window shifts and grows: it is
/// computed from the window's running `base_offset` plus its local cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Span {
    /// Create a new span with the given offset and length.
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Get the end offset (`offset + len`).
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// A 1-based line number paired with a 0-based column, as tracked by the
/// char window while it consumes input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineInfo {
    /// 1-based line number, incremented on every logical newline consumed.
    pub line_number: u64,
    /// Bytes consumed since the last newline (0-based).
    pub line_position: u64,
}
