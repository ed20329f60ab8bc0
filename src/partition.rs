//! Splitting the iteration range across workers.

use std::ops::Range;

use crate::config::MAX_WORKERS;
use crate::error::{EstimateError, Result};

/// Splits `[0, iterations)` into `workers` contiguous ranges.
///
/// The ranges are disjoint and cover the whole interval. `iterations % workers`
/// extra iterations go one each to the leading workers, so no two ranges
/// differ in length by more than one. When `iterations < workers` the trailing
/// ranges are empty. More than [`MAX_WORKERS`] workers is rejected.
pub fn partition(iterations: i64, workers: usize) -> Result<Vec<Range<i64>>> {
    if iterations < 0 {
        return Err(EstimateError::InvalidIterations(iterations));
    }
    if workers == 0 || workers > MAX_WORKERS {
        return Err(EstimateError::InvalidWorkers(workers));
    }
    let worker_count = i64::try_from(workers).map_err(|_| EstimateError::Overflow)?;

    let per_worker = iterations / worker_count;
    let remainder = iterations % worker_count;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0i64;
    for worker_id in 0..worker_count {
        let len = per_worker + i64::from(worker_id < remainder);
        let end = start.checked_add(len).ok_or(EstimateError::Overflow)?;
        ranges.push(start..end);
        start = end;
    }
    debug_assert_eq!(start, iterations);

    Ok(ranges)
}
