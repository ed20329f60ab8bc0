//! Sequential and parallel π estimators.
//!
//! Both estimators run the same per-stream kernel. The parallel one splits the
//! iteration range with [`partition`], hands each range to a worker that owns
//! a private stream and counter, and sums the counters once every worker has
//! been joined. Which fan-out mechanism runs the workers is a [`Backend`]
//! choice; given the same seed and worker count every backend produces the
//! same counts.

use std::ops::Range;

use crate::config::{Backend, DEFAULT_WORKERS};
use crate::error::{EstimateError, Result};
use crate::partition::partition;
use crate::sampler;

pub mod pool;
#[cfg(feature = "async")]
pub mod tasks;
pub mod threads;

/// What one worker did: its range and how many of its points landed inside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    pub range: Range<i64>,
    pub inside: i64,
}

impl WorkerReport {
    pub fn samples(&self) -> i64 {
        self.range.end - self.range.start
    }
}

/// Outcome of one estimator run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Estimate {
    pub iterations: i64,
    pub inside: i64,
    /// Per-worker breakdown. Empty for the sequential estimator.
    pub workers: Vec<WorkerReport>,
}

impl Estimate {
    pub fn pi(&self) -> f64 {
        pi_from_counts(self.inside, self.iterations)
    }
}

/// `4 * inside / iterations`.
pub fn pi_from_counts(inside: i64, iterations: i64) -> f64 {
    4.0 * inside as f64 / iterations as f64
}

/// Single-threaded estimate over one stream (stream id 0).
pub fn sequential(iterations: i64, base_seed: u64) -> Result<Estimate> {
    if iterations <= 0 {
        return Err(EstimateError::InvalidIterations(iterations));
    }

    let mut rng = sampler::stream(base_seed, 0);
    let inside = sampler::count_inside(&mut rng, iterations);

    let estimate = Estimate {
        iterations,
        inside,
        workers: Vec::new(),
    };
    tracing::info!(
        mode = "sequential",
        iterations,
        inside,
        pi = estimate.pi(),
        "estimate complete"
    );
    Ok(estimate)
}

/// Fan-out/fan-in estimator over a fixed number of workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelEstimator {
    workers: usize,
    backend: Backend,
}

impl Default for ParallelEstimator {
    fn default() -> Self {
        ParallelEstimator::new(DEFAULT_WORKERS)
    }
}

impl ParallelEstimator {
    pub fn new(workers: usize) -> Self {
        ParallelEstimator {
            workers,
            backend: Backend::default(),
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Runs every worker to completion and reduces their counts.
    ///
    /// Worker `i` samples from stream `i` under `base_seed`. A worker that
    /// fails fails the whole estimate; there is no partial result.
    pub fn estimate(&self, iterations: i64, base_seed: u64) -> Result<Estimate> {
        if iterations <= 0 {
            return Err(EstimateError::InvalidIterations(iterations));
        }
        let ranges = partition(iterations, self.workers)?;

        let reports = match self.backend {
            Backend::Threads => threads::run(base_seed, ranges)?,
            Backend::Pool => pool::run(base_seed, ranges)?,
            #[cfg(feature = "async")]
            Backend::Tasks => tasks::run(base_seed, ranges)?,
            #[cfg(not(feature = "async"))]
            Backend::Tasks => return Err(EstimateError::BackendUnavailable(Backend::Tasks.name())),
        };

        let estimate = reduce(iterations, reports)?;
        tracing::info!(
            mode = "parallel",
            backend = %self.backend,
            workers = self.workers,
            iterations,
            inside = estimate.inside,
            pi = estimate.pi(),
            "estimate complete"
        );
        Ok(estimate)
    }
}

/// Body of one worker: a private stream, a private counter, one range.
pub(crate) fn run_worker(base_seed: u64, worker: usize, range: Range<i64>) -> WorkerReport {
    let mut rng = sampler::stream(base_seed, worker as u64);
    let inside = sampler::count_inside(&mut rng, range.end - range.start);
    tracing::debug!(worker, start = range.start, end = range.end, inside, "worker finished");
    WorkerReport {
        worker,
        range,
        inside,
    }
}

// Test worker body: panics on worker 2, otherwise counts like `run_worker`
// and records that it finished.
#[cfg(test)]
pub(crate) fn panic_on_worker_two(
    finished: &'static std::sync::atomic::AtomicUsize,
) -> impl Fn(u64, usize, Range<i64>) -> WorkerReport + Send + Sync + Copy + 'static {
    move |base_seed, worker, range| {
        if worker == 2 {
            panic!("worker {worker} failed mid-range");
        }
        let report = run_worker(base_seed, worker, range);
        finished.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        report
    }
}

// Called only after every worker has been joined.
fn reduce(iterations: i64, reports: Vec<WorkerReport>) -> Result<Estimate> {
    let mut inside = 0i64;
    for report in &reports {
        inside = inside
            .checked_add(report.inside)
            .ok_or(EstimateError::Overflow)?;
    }
    Ok(Estimate {
        iterations,
        inside,
        workers: reports,
    })
}
