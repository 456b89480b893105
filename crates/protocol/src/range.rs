//! Byte-range descriptors carried in the `range` form field.

use std::fmt;

/// Errors produced when a range violates `start < end <= total`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("empty range: start {start} is not before end {end}")]
    Empty { start: u64, end: u64 },

    #[error("range end {end} exceeds total length {total}")]
    PastEnd { end: u64, total: u64 },
}

/// A half-open slice `[start, end)` of a file of `total` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    start: u64,
    end: u64,
    total: u64,
}

impl ByteRange {
    /// Creates a range, enforcing `start < end <= total`.
    pub fn new(start: u64, end: u64, total: u64) -> Result<Self, RangeError> {
        if start >= end {
            return Err(RangeError::Empty { start, end });
        }
        if end > total {
            return Err(RangeError::PastEnd { end, total });
        }
        Ok(Self { start, end, total })
    }

    /// First byte offset (inclusive).
    pub fn start(&self) -> u64 {
        self.start
    }

    /// End offset (exclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Length of the whole file.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Always `false`; a valid range covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Renders as `bytes=<start>-<end-1>/<total>`.
impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes={}-{}/{}", self.start, self.end - 1, self.total)
    }
}

/// Formats a range descriptor without constructing a [`ByteRange`].
///
/// The caller guarantees `start < end <= total`.
pub fn format_range(start: u64, end: u64, total: u64) -> String {
    debug_assert!(start < end && end <= total);
    format!("bytes={}-{}/{}", start, end - 1, total)
}
