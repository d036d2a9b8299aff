//! Chunk fetcher: one ranged GET per call on a fresh connection.

use crate::control::CancelToken;
use crate::http::{self, FetchError, HttpOptions, Response, Target};
use crate::session::ByteRange;

/// Send `GET` with `Range: bytes=start-end` and return the full raw response.
///
/// The response is whatever the server sent; see [`fetch_chunk`] for the
/// validated variant.
pub fn fetch(
    target: &Target,
    range: ByteRange,
    opts: &HttpOptions,
    cancel: &CancelToken,
) -> Result<Response, FetchError> {
    let request = http::range_request(target, range, &opts.user_agent);
    tracing::debug!("GET {} bytes={}", target, range);
    http::exchange(target, &request, opts, cancel)
}

/// Check that `response` really carries bytes `range`.
///
/// - `206` must name exactly the requested span in `Content-Range`.
/// - `200` means the server ignored `Range`; that is only acceptable when the
///   requested span is the whole body.
/// - The body must be exactly `range.len()` bytes.
pub fn validate_range(response: &Response, range: ByteRange) -> Result<(), FetchError> {
    if !response.has_header_terminator() {
        tracing::warn!("response for bytes={} has no header terminator", range);
    }
    let status = response
        .status_code()
        .ok_or_else(|| FetchError::MalformedResponse("missing status line".to_string()))?;
    let body_len = response.body().len() as u64;

    match status {
        206 => {
            let matches = response
                .content_range()
                .is_some_and(|cr| cr.range == range);
            if !matches {
                return Err(FetchError::RangeMismatch {
                    expected: range,
                    got: response.header("content-range").unwrap_or("").to_string(),
                });
            }
        }
        200 => {
            if range.start != 0 || body_len != range.len() {
                return Err(FetchError::RangeNotHonored(range));
            }
        }
        code => return Err(FetchError::HttpStatus(code)),
    }

    if body_len != range.len() {
        return Err(FetchError::PartialTransfer {
            expected: range.len(),
            received: body_len,
        });
    }
    Ok(())
}

/// [`fetch`] followed by [`validate_range`].
pub fn fetch_chunk(
    target: &Target,
    range: ByteRange,
    opts: &HttpOptions,
    cancel: &CancelToken,
) -> Result<Response, FetchError> {
    let response = fetch(target, range, opts, cancel)?;
    validate_range(&response, range)?;
    Ok(response)
}
