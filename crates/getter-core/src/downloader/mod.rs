//! Orchestrator: probe once, split into chunk tasks, fetch them on a fixed
//! worker pool through the bounded queue, and assemble the result.
//!
//! Termination uses one poison pill per worker: the producer enqueues every
//! real task followed by `worker_count` [`Job::Stop`] items, so each worker
//! exits after taking exactly one pill. Independently, the orchestrator counts
//! one report per task and knows the download is complete after `N` reports.
//!
//! Failure policy: every chunk is retried according to the configured
//! [`RetryPolicy`]. The first chunk that still fails aborts the whole download:
//! in-flight fetches are cancelled, the queue is closed (releasing the producer
//! and idle workers) and [`DownloadError::Chunk`] names the failed chunk.

mod error;
mod worker;

pub use error::DownloadError;

use std::slice::ChunksMut;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::control::CancelToken;
use crate::http::{FetchError, HttpOptions, Target};
use crate::probe;
use crate::queue::BoundedQueue;
use crate::retry::RetryPolicy;
use crate::session::{DownloadSession, Task};
use worker::{Job, Report, WorkerContext};

/// How often the orchestrator re-checks the caller's cancel token while waiting.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Knobs for one download.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadOptions {
    pub http: HttpOptions,
    pub retry: RetryPolicy,
    /// Work queue capacity; defaults to the worker count.
    pub queue_capacity: Option<usize>,
}

#[derive(Debug)]
pub struct Downloader {
    options: DownloadOptions,
    cancel: CancelToken,
}

impl Downloader {
    pub fn new(options: DownloadOptions) -> Self {
        Self::with_cancel(options, CancelToken::new())
    }

    /// Use `cancel` to let another thread abort the download.
    pub fn with_cancel(options: DownloadOptions, cancel: CancelToken) -> Self {
        Self { options, cancel }
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Probe `target` and build the session. Must return before any worker starts.
    pub fn probe(
        &self,
        target: Target,
        worker_count: usize,
    ) -> Result<DownloadSession, DownloadError> {
        probe::probe(target, worker_count, &self.options.http, &self.cancel).map_err(|e| match e {
            FetchError::Cancelled => DownloadError::Cancelled,
            e => DownloadError::Probe(e),
        })
    }

    /// Probe, then download. Returns the session alongside the assembled bytes.
    pub fn get(
        &self,
        target: Target,
        worker_count: usize,
    ) -> Result<(DownloadSession, Vec<u8>), DownloadError> {
        let session = self.probe(target, worker_count)?;
        let bytes = self.download(&session)?;
        Ok((session, bytes))
    }

    /// Fetch every chunk of `session` and return the reassembled resource.
    pub fn download(&self, session: &DownloadSession) -> Result<Vec<u8>, DownloadError> {
        let size = session.resource_size();
        let len = usize::try_from(size).map_err(|_| DownloadError::TooLarge(size))?;
        if len == 0 {
            tracing::info!("{} is empty; nothing to fetch", session.target());
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let mut output = Vec::new();
        output
            .try_reserve_exact(len)
            .map_err(|_| DownloadError::TooLarge(size))?;
        output.resize(len, 0u8);
        self.run_pool(session, &mut output)?;
        tracing::info!(
            "downloaded {} bytes from {} in {:.2?}",
            len,
            session.target(),
            started.elapsed()
        );
        Ok(output)
    }

    fn run_pool(&self, session: &DownloadSession, output: &mut [u8]) -> Result<(), DownloadError> {
        let tasks = session.tasks();
        let task_count = tasks.len();
        let workers = session.worker_count();
        let chunk_size = usize::try_from(session.chunk_size())
            .map_err(|_| DownloadError::TooLarge(session.resource_size()))?;
        let capacity = self.options.queue_capacity.unwrap_or(workers);

        let queue: BoundedQueue<Job<'_>> = BoundedQueue::new(capacity)?;
        let slices = output.chunks_mut(chunk_size);
        let run_cancel = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        tracing::debug!(
            "{} tasks of up to {} bytes, {} workers, queue capacity {}",
            task_count,
            chunk_size,
            workers,
            capacity
        );

        thread::scope(|s| {
            let queue = &queue;
            let mut handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let tx = tx.clone();
                let ctx = WorkerContext {
                    http: &self.options.http,
                    retry: &self.options.retry,
                    cancel: &run_cancel,
                };
                handles.push(s.spawn(move || worker::run(id, queue, tx, ctx)));
            }
            drop(tx);

            let producer = s.spawn(move || produce(queue, tasks, slices, workers));

            let result = self.collect(&rx, task_count);
            if result.is_err() {
                run_cancel.cancel();
                queue.close();
            }

            let mut panicked = producer.join().is_err();
            for handle in handles {
                panicked |= handle.join().is_err();
            }
            match result {
                Ok(()) if panicked => Err(DownloadError::WorkerPanicked),
                other => other,
            }
        })
    }

    /// Wait for exactly `expected` reports; stop at the first failure.
    fn collect(
        &self,
        reports: &mpsc::Receiver<Report>,
        expected: usize,
    ) -> Result<(), DownloadError> {
        let mut remaining = expected;
        while remaining > 0 {
            if self.cancel.is_cancelled() {
                return Err(DownloadError::Cancelled);
            }
            match reports.recv_timeout(CANCEL_POLL_INTERVAL) {
                Ok(Report {
                    chunk_index,
                    outcome,
                }) => {
                    remaining -= 1;
                    match outcome {
                        Ok(_) => {}
                        Err(FetchError::Cancelled) => return Err(DownloadError::Cancelled),
                        Err(source) => {
                            return Err(DownloadError::Chunk {
                                index: chunk_index,
                                source,
                            })
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                // Every worker is gone but reports are missing.
                Err(RecvTimeoutError::Disconnected) => return Err(DownloadError::WorkerPanicked),
            }
        }
        Ok(())
    }
}

/// Producer: enqueue every task with its output slice, then one pill per worker.
fn produce<'buf>(
    queue: &BoundedQueue<Job<'buf>>,
    tasks: Vec<Task>,
    slices: ChunksMut<'buf, u8>,
    workers: usize,
) {
    for (task, dest) in tasks.into_iter().zip(slices) {
        debug_assert_eq!(dest.len() as u64, task.range().len());
        if queue.put(Job::Fetch { task, dest }).is_err() {
            tracing::debug!("producer: queue closed");
            return;
        }
    }
    for _ in 0..workers {
        if queue.put(Job::Stop).is_err() {
            return;
        }
    }
}
