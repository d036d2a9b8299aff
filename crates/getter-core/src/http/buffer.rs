//! Growable response buffer filled from a socket until the peer closes.

use std::io::{self, Read};

use super::FetchError;
use crate::control::CancelToken;

/// Size of each socket read.
const READ_CHUNK: usize = 1024;

/// Raw bytes of one HTTP response (status line, headers and body).
///
/// Grows by doubling its capacity whenever an `append` would overflow it.
/// Its length only ever increases while being filled.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseBuffer {
    data: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::with_capacity(READ_CHUNK)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Append `bytes`, doubling capacity as many times as needed to fit them.
    pub fn append(&mut self, bytes: &[u8]) {
        let needed = self.data.len() + bytes.len();
        if needed > self.data.capacity() {
            let mut new_capacity = self.data.capacity().max(1);
            while new_capacity < needed {
                new_capacity *= 2;
            }
            self.data.reserve_exact(new_capacity - self.data.len());
        }
        self.data.extend_from_slice(bytes);
    }

    /// Read from `reader` until end-of-stream (a zero-length read), appending
    /// everything. Checks `cancel` before every read. Returns bytes appended.
    pub fn fill_from<R: Read>(
        &mut self,
        reader: &mut R,
        cancel: &CancelToken,
    ) -> Result<usize, FetchError> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut total = 0usize;
        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            match reader.read(&mut chunk) {
                Ok(0) => return Ok(total),
                Ok(n) => {
                    self.append(&chunk[..n]);
                    total += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(FetchError::ReadFailed(e)),
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for ResponseBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}
