//! The auxiliary buffer used only when a scalar needs escape processing.

/// An owned, growable text buffer that survives across tokens so its
/// allocation can be reused. `std::string::String` already grows
/// geometrically, so this is a thin wrapper whose job is `reset`: drop the
/// contents but keep the capacity, exactly like the spec's `StringBuffer`.
#[derive(Debug, Default)]
pub(crate) struct StringBuffer {
    buf: String,
}

impl StringBuffer {
    pub(crate) fn new() -> Self {
        Self {
            buf: String::with_capacity(64),
        }
    }

    /// Drop the contents, keep the allocation.
    pub(crate) fn reset(&mut self) {
        self.buf.clear();
    }

    pub(crate) fn append_char(&mut self, c: char) {
        self.buf.push(c);
    }

    pub(crate) fn append_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Take the accumulated text, leaving the buffer empty (capacity kept).
    pub(crate) fn take(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}
