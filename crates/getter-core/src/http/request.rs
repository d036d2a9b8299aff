//! Minimal HTTP/1.0 request lines.

use super::Target;
use crate::session::ByteRange;

/// `HEAD` request used to discover the resource size.
pub fn head_request(target: &Target, user_agent: &str) -> String {
    format!(
        "HEAD /{} HTTP/1.0\r\nHost: {}\r\nUser-Agent: {}\r\n\r\n",
        target.path(),
        target.host(),
        user_agent
    )
}

/// Ranged `GET` request for one chunk.
pub fn range_request(target: &Target, range: ByteRange, user_agent: &str) -> String {
    format!(
        "GET /{} HTTP/1.0\r\nHost: {}\r\nRange: {}\r\nUser-Agent: {}\r\n\r\n",
        target.path(),
        target.host(),
        range.header_value(),
        user_agent
    )
}
