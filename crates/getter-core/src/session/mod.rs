//! Per-download context and chunk planning.
//!
//! A `DownloadSession` is built once, by the probe, before any worker exists.
//! It is read-only afterwards: workers only ever see `&DownloadSession` or the
//! `Task`s planned from it.

mod range;

use std::sync::Arc;

pub use range::ByteRange;

use crate::http::{FetchError, Target};

/// Bytes per chunk for `worker_count` workers: `resource_size / worker_count + 1`.
///
/// The `+ 1` can make `chunk_size * worker_count` exceed the resource size;
/// the last chunk's range is clamped when tasks are planned.
pub fn chunk_size_for(resource_size: u64, worker_count: usize) -> u64 {
    (resource_size / worker_count.max(1) as u64).saturating_add(1)
}

/// Shared, immutable description of one download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSession {
    target: Arc<Target>,
    resource_size: u64,
    worker_count: usize,
    chunk_size: u64,
}

impl DownloadSession {
    pub fn new(
        target: Target,
        resource_size: u64,
        worker_count: usize,
    ) -> Result<Self, FetchError> {
        if worker_count == 0 {
            return Err(FetchError::InvalidWorkerCount);
        }
        Ok(Self {
            target: Arc::new(target),
            resource_size,
            worker_count,
            chunk_size: chunk_size_for(resource_size, worker_count),
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn resource_size(&self) -> u64 {
        self.resource_size
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Number of chunks: `ceil(resource_size / chunk_size)`.
    pub fn task_count(&self) -> usize {
        self.resource_size.div_ceil(self.chunk_size) as usize
    }

    /// One task per chunk, in chunk order, with disjoint clamped ranges.
    pub fn tasks(&self) -> Vec<Task> {
        (0..self.task_count())
            .map_while(|index| {
                ByteRange::for_chunk(index, self.chunk_size, self.resource_size).map(|range| Task {
                    chunk_index: index,
                    range,
                    target: Arc::clone(&self.target),
                })
            })
            .collect()
    }
}

/// Fetch one chunk of the resource. Immutable once planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    chunk_index: usize,
    range: ByteRange,
    target: Arc<Target>,
}

impl Task {
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    pub fn range(&self) -> ByteRange {
        self.range
    }

    pub fn range_start(&self) -> u64 {
        self.range.start
    }

    pub fn range_end(&self) -> u64 {
        self.range.end
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn host(&self) -> &str {
        self.target.host()
    }

    pub fn path(&self) -> &str {
        self.target.path()
    }
}
