//! Range probe: a HEAD request that sizes the resource before it is split.

use crate::control::CancelToken;
use crate::http::{self, FetchError, HttpOptions, Response, Target};
use crate::session::DownloadSession;

/// What the HEAD response told us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadResult {
    /// Value of `Content-Length`.
    pub resource_size: u64,
    /// True if the server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
}

/// Interpret a HEAD response. Split out from [`head`] so it can be tested
/// without a socket.
pub fn parse_head_response(response: &Response) -> Result<HeadResult, FetchError> {
    let status = response.status_code().ok_or_else(|| {
        FetchError::MalformedResponse("HEAD response has no status line".to_string())
    })?;
    if !(200..300).contains(&status) {
        return Err(FetchError::HttpStatus(status));
    }
    let resource_size = response
        .content_length()
        .ok_or(FetchError::MissingContentLength)?;
    let accept_ranges = response
        .header("accept-ranges")
        .is_some_and(|v| v.eq_ignore_ascii_case("bytes"));
    Ok(HeadResult {
        resource_size,
        accept_ranges,
    })
}

/// Send a HEAD request for `target` and parse the size out of the reply.
pub fn head(
    target: &Target,
    opts: &HttpOptions,
    cancel: &CancelToken,
) -> Result<HeadResult, FetchError> {
    let request = http::head_request(target, &opts.user_agent);
    let response = http::exchange(target, &request, opts, cancel)?;
    parse_head_response(&response)
}

/// Probe `target` and build the session every worker will share.
///
/// The returned session fixes `resource_size` and `chunk_size` before any
/// worker is spawned.
pub fn probe(
    target: Target,
    worker_count: usize,
    opts: &HttpOptions,
    cancel: &CancelToken,
) -> Result<DownloadSession, FetchError> {
    if worker_count == 0 {
        return Err(FetchError::InvalidWorkerCount);
    }
    let result = head(&target, opts, cancel)?;
    if !result.accept_ranges {
        tracing::warn!(
            "{} does not advertise Accept-Ranges: bytes; chunks will be validated",
            target
        );
    }
    let session = DownloadSession::new(target, result.resource_size, worker_count)?;
    tracing::info!(
        "probed {}: {} bytes, chunk size {} for {} workers",
        session.target(),
        session.resource_size(),
        session.chunk_size(),
        worker_count
    );
    Ok(session)
}
