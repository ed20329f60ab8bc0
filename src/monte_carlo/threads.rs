use std::ops::Range;
use std::thread;

use super::{run_worker, WorkerReport};
use crate::error::{EstimateError, Result};

/// One OS thread per range, joined in order.
///
/// Each thread returns its private count through its join handle, so the
/// reduction only ever sees finished contributions. If spawning fails part way
/// the workers already started are detached and the error is returned.
pub fn run(base_seed: u64, ranges: Vec<Range<i64>>) -> Result<Vec<WorkerReport>> {
    run_with(base_seed, ranges, run_worker)
}

/// [`run`] with a caller-chosen worker body.
///
/// Every handle is joined even after a failure; the first failed worker is
/// reported and no reports are returned.
pub(crate) fn run_with<F>(base_seed: u64, ranges: Vec<Range<i64>>, body: F) -> Result<Vec<WorkerReport>>
where
    F: Fn(u64, usize, Range<i64>) -> WorkerReport + Send + Sync + Copy + 'static,
{
    let mut handles = Vec::with_capacity(ranges.len());

    for (worker, range) in ranges.into_iter().enumerate() {
        let handle = thread::Builder::new()
            .name(format!("pi-worker-{worker}"))
            .spawn(move || body(base_seed, worker, range))
            .map_err(|source| EstimateError::WorkerSpawn { worker, source })?;

        handles.push(handle);
    }

    let mut reports = Vec::with_capacity(handles.len());
    let mut failed = None;
    for (worker, handle) in handles.into_iter().enumerate() {
        match handle.join() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::panic_on_worker_two;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn reports_come_back_in_worker_order() {
        let reports = run(1, vec![0..10, 10..10, 10..25]).unwrap();
        let workers: Vec<usize> = reports.iter().map(|r| r.worker).collect();
        assert_eq!(workers, vec![0, 1, 2]);
        assert_eq!(reports[1].inside, 0);
        assert_eq!(reports[2].range, 10..25);
    }

    #[test]
    fn worker_count_matches_range_count() {
        let ranges = crate::partition::partition(1_000, 13).unwrap();
        assert_eq!(run(4, ranges).unwrap().len(), 13);
    }

    #[test]
    fn failed_worker_fails_the_run_after_joining_the_rest() {
        static FINISHED: AtomicUsize = AtomicUsize::new(0);
        let ranges = crate::partition::partition(5_000, 5).unwrap();

        let result = run_with(6, ranges, panic_on_worker_two(&FINISHED));

        assert!(matches!(result, Err(EstimateError::WorkerPanicked { worker: 2 })));
        assert_eq!(FINISHED.load(Ordering::SeqCst), 4);
    }
}
