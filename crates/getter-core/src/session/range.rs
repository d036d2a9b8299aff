//! Byte range type and chunk range math.

use std::fmt;

/// An inclusive byte range `[start, end]`, as written in an HTTP `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset (inclusive).
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(end >= start, "byte range end before start");
        Self { start, end }
    }

    /// Range covered by chunk `index` when a resource of `total` bytes is cut
    /// into `chunk_size` pieces. The last chunk is clamped to `total - 1`.
    /// Returns `None` once `index` is past the end of the resource.
    pub fn for_chunk(index: usize, chunk_size: u64, total: u64) -> Option<Self> {
        if chunk_size == 0 {
            return None;
        }
        let start = (index as u64).checked_mul(chunk_size)?;
        if start >= total {
            return None;
        }
        let end = start.saturating_add(chunk_size).min(total) - 1;
        Some(Self { start, end })
    }

    /// Number of bytes in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Range` header value: `bytes=start-end`.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
