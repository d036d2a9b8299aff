//! Map fetch errors onto retry error kinds.

use super::policy::ErrorKind;
use crate::http::FetchError;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u16) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code),
        _ => ErrorKind::Other,
    }
}

pub fn classify(e: &FetchError) -> ErrorKind {
    if e.is_timeout() {
        return ErrorKind::Timeout;
    }
    match e {
        FetchError::DnsResolutionFailed { .. }
        | FetchError::ConnectionFailed { .. }
        | FetchError::WriteFailed(_)
        | FetchError::ReadFailed(_)
        | FetchError::PartialTransfer { .. } => ErrorKind::Connection,
        FetchError::HttpStatus(code) => classify_http_status(*code),
        FetchError::MalformedResponse(_)
        | FetchError::MissingContentLength
        | FetchError::RangeMismatch { .. }
        | FetchError::RangeNotHonored(_)
        | FetchError::InvalidWorkerCount
        | FetchError::Cancelled => ErrorKind::Other,
    }
}
