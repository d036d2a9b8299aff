//! Retry and backoff for chunk fetches.
//!
//! Classifies a [`FetchError`](crate::http::FetchError) into a coarse
//! [`ErrorKind`] and turns that into a backoff decision, so the orchestrator
//! applies one explicit policy to every chunk.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
