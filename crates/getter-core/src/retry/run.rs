//! Retry loop: run a fallible fetch until success or the policy says stop.

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::control::CancelToken;
use crate::http::FetchError;

/// Runs `f` until it succeeds or the retry policy gives up, sleeping for the
/// backoff delay between attempts. Returns the last error on give-up, or
/// `FetchError::Cancelled` as soon as `cancel` is raised before an attempt or
/// during a backoff.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut f: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(
                        "attempt {} failed: {}; retrying in {:?}",
                        attempt,
                        e,
                        d
                    );
                    if cancel.wait_cancelled(d) {
                        tracing::debug!("retry backoff interrupted by cancel");
                        return Err(FetchError::Cancelled);
                    }
                    attempt += 1;
                }
            },
        }
    }
}
