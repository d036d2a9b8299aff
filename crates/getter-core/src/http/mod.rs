//! Raw HTTP/1.0 client over plain TCP.
//!
//! No framing library: requests are formatted by hand, responses are read
//! until the server closes the connection and split at the first blank line.
//! One connection per request; no keep-alive, redirects or chunked encoding.

mod buffer;
mod connection;
mod error;
mod request;
mod response;
mod target;

use std::time::Duration;

pub(crate) use connection::exchange;

pub use buffer::ResponseBuffer;
pub use error::FetchError;
pub use request::{head_request, range_request};
pub use response::{
    extract_body, find_header_end, header_value, parse_content_length, parse_status_code,
    ContentRange, Response,
};
pub use target::{Target, TargetError, DEFAULT_PORT};

/// Value sent in the `User-Agent` header unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = "getter";

/// Per-request socket settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub user_agent: String,
    /// Connect timeout; `None` blocks until the OS gives up.
    pub connect_timeout: Option<Duration>,
    /// Read and write timeout on the socket; `None` blocks indefinitely.
    pub io_timeout: Option<Duration>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Some(Duration::from_secs(15)),
            io_timeout: Some(Duration::from_secs(30)),
        }
    }
}
