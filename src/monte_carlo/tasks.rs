use std::ops::Range;

use tokio::runtime;
use tokio::task;

use super::{run_worker, WorkerReport};
use crate::error::{EstimateError, Result};

/// Runs each range as a blocking task and awaits the handles in order.
///
/// Must be polled inside a tokio runtime.
pub async fn run_async(base_seed: u64, ranges: Vec<Range<i64>>) -> Result<Vec<WorkerReport>> {
    run_async_with(base_seed, ranges, run_worker).await
}

/// [`run_async`] with a caller-chosen worker body.
///
/// Every handle is awaited even after a failure; the first failed worker is
/// reported and no reports are returned.
pub(crate) async fn run_async_with<F>(
    base_seed: u64,
    ranges: Vec<Range<i64>>,
    body: F,
) -> Result<Vec<WorkerReport>>
where
    F: Fn(u64, usize, Range<i64>) -> WorkerReport + Send + Sync + Copy + 'static,
{
    let mut handles = Vec::with_capacity(ranges.len());

    for (worker, range) in ranges.into_iter().enumerate() {
        let handle = task::spawn_blocking(move || body(base_seed, worker, range));
        handles.push(handle);
    }

    let mut reports = Vec::with_capacity(handles.len());
    let mut failed = None;
    for (worker, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(report) => reports.push(report),
            Err(_) if failed.is_none() => failed = Some(worker),
            Err(_) => {}
        }
    }

    match failed {
        Some(worker) => Err(EstimateError::WorkerPanicked { worker }),
        None => Ok(reports),
    }
}

/// Builds a runtime whose blocking pool fits one thread per range, then
/// drives [`run_async`] to completion on it.
pub fn run(base_seed: u64, ranges: Vec<Range<i64>>) -> Result<Vec<WorkerReport>> {
    run_with(base_seed, ranges, run_worker)
}

pub(crate) fn run_with<F>(base_seed: u64, ranges: Vec<Range<i64>>, body: F) -> Result<Vec<WorkerReport>>
where
    F: Fn(u64, usize, Range<i64>) -> WorkerReport + Send + Sync + Copy + 'static,
{
    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(ranges.len().max(1))
        .thread_name("pi-task")
        .build()
        .map_err(EstimateError::Runtime)?;

    runtime.block_on(run_async_with(base_seed, ranges, body))
}
