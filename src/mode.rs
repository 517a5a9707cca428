//! The read-mode hint, scoped to a single top-level `read_*` call and reset
//! to `Read` at entry.

/// Biases scalar materialization toward a specific typed result for the
/// duration of a single top-level `read_*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Plain `read`: no coercion bias.
    Read,
    /// Biases number parsing toward a 32-bit integer.
    ReadAsInt32,
    /// Biases number parsing toward [`rust_decimal::Decimal`].
    ReadAsDecimal,
    /// Biases string/array parsing toward a binary blob.
    ReadAsBytes,
    /// Biases `/Date(...)/ ` parsing toward carrying its literal offset.
    ReadAsDateTimeOffset,
}
