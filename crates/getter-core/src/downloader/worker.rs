//! Worker loop: pull jobs off the queue until a stop pill (or a closed queue).

use std::sync::mpsc;

use crate::control::CancelToken;
use crate::fetch::fetch_chunk;
use crate::http::{FetchError, HttpOptions};
use crate::queue::BoundedQueue;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::session::Task;

/// Item carried by the work queue.
pub(super) enum Job<'buf> {
    /// Fetch `task` and copy its body into `dest`, the task's slice of the output.
    Fetch { task: Task, dest: &'buf mut [u8] },
    /// Poison pill: the worker that takes it exits.
    Stop,
}

/// Outcome of one task, sent back to the orchestrator.
pub(super) struct Report {
    pub chunk_index: usize,
    pub outcome: Result<usize, FetchError>,
}

pub(super) struct WorkerContext<'a> {
    pub http: &'a HttpOptions,
    pub retry: &'a RetryPolicy,
    pub cancel: &'a CancelToken,
}

pub(super) fn run(
    id: usize,
    queue: &BoundedQueue<Job<'_>>,
    reports: mpsc::Sender<Report>,
    ctx: WorkerContext<'_>,
) {
    loop {
        let job = match queue.get() {
            Ok(job) => job,
            Err(_) => {
                tracing::debug!("worker {}: queue closed", id);
                return;
            }
        };
        let (task, dest) = match job {
            Job::Stop => {
                tracing::trace!("worker {}: stop", id);
                return;
            }
            Job::Fetch { task, dest } => (task, dest),
        };

        let chunk_index = task.chunk_index();
        let outcome = fetch_into(&task, dest, &ctx);
        match &outcome {
            Ok(n) => tracing::debug!("worker {}: chunk {} done ({} bytes)", id, chunk_index, n),
            Err(e) => tracing::warn!("worker {}: chunk {} failed: {}", id, chunk_index, e),
        }
        if reports.send(Report { chunk_index, outcome }).is_err() {
            return;
        }
    }
}

fn fetch_into(task: &Task, dest: &mut [u8], ctx: &WorkerContext<'_>) -> Result<usize, FetchError> {
    let range = task.range();
    let response = run_with_retry(ctx.retry, ctx.cancel, || {
        fetch_chunk(task.target(), range, ctx.http, ctx.cancel)
    })?;
    let body = response.body();
    if body.len() != dest.len() {
        return Err(FetchError::PartialTransfer {
            expected: dest.len() as u64,
            received: body.len() as u64,
        });
    }
    dest.copy_from_slice(body);
    Ok(body.len())
}
