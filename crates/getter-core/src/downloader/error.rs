use thiserror::Error;

use crate::http::FetchError;
use crate::queue::QueueError;

/// Why a download as a whole failed.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("probe failed")]
    Probe(#[source] FetchError),
    /// A chunk still failed after the retry policy gave up; the rest of the
    /// download was abandoned.
    #[error("chunk {index} failed")]
    Chunk {
        index: usize,
        #[source]
        source: FetchError,
    },
    #[error("download cancelled")]
    Cancelled,
    #[error("a download worker panicked")]
    WorkerPanicked,
    #[error("resource of {0} bytes does not fit in memory")]
    TooLarge(u64),
    #[error(transparent)]
    Queue(#[from] QueueError),
}
