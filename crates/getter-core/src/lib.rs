//! getter core: fetch an HTTP/1.0 resource in parallel byte ranges.
//!
//! A HEAD probe sizes the resource, the orchestrator cuts it into one chunk
//! per worker, and a fixed worker pool pulls chunk tasks from a bounded
//! blocking queue, fetching each over its own TCP connection and writing it
//! into a disjoint slice of the output buffer.

pub mod config;
pub mod logging;

pub mod control;
pub mod downloader;
pub mod fetch;
pub mod http;
pub mod probe;
pub mod queue;
pub mod retry;
pub mod session;

pub use control::CancelToken;
pub use downloader::{DownloadError, DownloadOptions, Downloader};
pub use http::{FetchError, HttpOptions, Target};
pub use queue::BoundedQueue;
pub use session::{ByteRange, DownloadSession, Task};
