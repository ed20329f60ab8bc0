use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use super::{run_worker, WorkerReport};
use crate::error::{EstimateError, Result};

/// Parallel map over the ranges on a dedicated rayon pool.
///
/// The pool has exactly one thread per range and is torn down on return. Work
/// stealing may move a range to any pool thread, but the stream follows the
/// range index, so the counts do not depend on scheduling.
pub fn run(base_seed: u64, ranges: Vec<Range<i64>>) -> Result<Vec<WorkerReport>> {
    run_with(base_seed, ranges, run_worker)
}

/// [`run`] with a caller-chosen worker body. A panicking body fails the run.
pub(crate) fn run_with<F>(base_seed: u64, ranges: Vec<Range<i64>>, body: F) -> Result<Vec<WorkerReport>>
where
    F: Fn(u64, usize, Range<i64>) -> WorkerReport + Send + Sync + Copy,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(ranges.len())
        .thread_name(|index| format!("pi-pool-{index}"))
        .build()?;

    pool.install(|| {
        ranges
            .into_par_iter()
            .enumerate()
            .map(|(worker, range)| {
                panic::catch_unwind(AssertUnwindSafe(move || body(base_seed, worker, range)))
                    .map_err(|_| EstimateError::WorkerPanicked { worker })
            })
            .collect()
    })
}
