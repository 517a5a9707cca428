//! Shared test helpers for simulating adversarial I/O chunking.

use std::io::Read;

/// Simulates short reads by returning at most `max_bytes_per_read` bytes per call,
/// to exercise the window's refill/shift/grow paths under adversarial chunking.
pub struct ShortReadAdapter<R> {
    inner: R,
    max_bytes_per_read: usize,
}

impl<R> ShortReadAdapter<R> {
    pub fn new(inner: R, max_bytes_per_read: usize) -> Self {
        Self {
            inner,
            max_bytes_per_read,
        }
    }
}

impl<R: Read> Read for ShortReadAdapter<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = buf.len().min(self.max_bytes_per_read);
        self.inner.read(&mut buf[..len])
    }
}
