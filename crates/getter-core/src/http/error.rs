//! Errors from a single HTTP exchange (probe or chunk fetch).

use std::io;
use thiserror::Error;

use crate::session::ByteRange;

/// Everything that can go wrong talking to the server. None of these abort the
/// process; the orchestrator decides whether to retry or give up.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not resolve host {host}")]
    DnsResolutionFailed {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("could not connect to {addr}")]
    ConnectionFailed {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to send request")]
    WriteFailed(#[source] io::Error),
    #[error("failed to read response")]
    ReadFailed(#[source] io::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("response carries no Content-Length header")]
    MissingContentLength,
    #[error("server returned HTTP {0}")]
    HttpStatus(u16),
    #[error("requested bytes {expected} but server sent Content-Range {got:?}")]
    RangeMismatch { expected: ByteRange, got: String },
    #[error("server ignored Range {0} and sent the whole resource")]
    RangeNotHonored(ByteRange),
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,
    #[error("cancelled")]
    Cancelled,
}

impl FetchError {
    /// True if the underlying socket error was a read/write/connect timeout.
    pub fn is_timeout(&self) -> bool {
        let io = match self {
            FetchError::ConnectionFailed { source, .. } => source,
            FetchError::WriteFailed(e) | FetchError::ReadFailed(e) => e,
            _ => return false,
        };
        matches!(
            io.kind(),
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
        )
    }
}
