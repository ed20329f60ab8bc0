//! Runs both estimators back to back and reports timings and speedup.

use std::io::Write;
use std::time::{Duration, Instant};

use crate::config::EstimatorConfig;
use crate::error::Result;
use crate::monte_carlo::{self, Estimate, ParallelEstimator};

/// An estimate together with the wall-clock time it took.
#[derive(Clone, Debug)]
pub struct Timed {
    pub estimate: Estimate,
    pub elapsed: Duration,
}

/// Both phases of one run.
#[derive(Clone, Debug)]
pub struct Report {
    pub base_seed: u64,
    pub sequential: Timed,
    pub parallel: Timed,
}

impl Report {
    /// Sequential time over parallel time.
    pub fn speedup(&self) -> f64 {
        self.sequential.elapsed.as_secs_f64() / self.parallel.elapsed.as_secs_f64()
    }
}

fn timed(phase: impl FnOnce() -> Result<Estimate>) -> Result<Timed> {
    let start = Instant::now();
    let estimate = phase()?;
    Ok(Timed {
        estimate,
        elapsed: start.elapsed(),
    })
}

/// Runs the sequential then the parallel estimator and writes the report to
/// `out` as each phase finishes.
///
/// The seed source is resolved once, so both phases share a base seed.
pub fn run<W: Write>(config: &EstimatorConfig, out: &mut W) -> Result<Report> {
    config.validate()?;
    let base_seed = config.seed.resolve();
    tracing::info!(
        iterations = config.iterations,
        workers = config.workers,
        backend = %config.backend,
        base_seed,
        "starting run"
    );

    writeln!(out, "\nTIMING SEQUENTIAL:")?;
    out.flush()?;
    let sequential = timed(|| monte_carlo::sequential(config.iterations, base_seed))?;
    writeln!(out, "Took {:.6} seconds", sequential.elapsed.as_secs_f64())?;

    writeln!(out, "\nTIMING PARALLEL:")?;
    out.flush()?;
    let estimator = ParallelEstimator::new(config.workers).with_backend(config.backend);
    let parallel = timed(|| estimator.estimate(config.iterations, base_seed))?;
    writeln!(out, "Took {:.6} seconds\n", parallel.elapsed.as_secs_f64())?;

    let report = Report {
        base_seed,
        sequential,
        parallel,
    };

    writeln!(out, "Sequential: Estimated π = {:.10}", report.sequential.estimate.pi())?;
    writeln!(out, "Parallel: Estimated π = {:.10}", report.parallel.estimate.pi())?;
    writeln!(out, "Speed up: {:.6}", report.speedup())?;
    out.flush()?;

    Ok(report)
}
