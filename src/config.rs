//! Run configuration and command line parsing.
//!
//! Arguments are parsed by hand; the grammar is a handful of flags:
//!
//! ```text
//! monte-carlo-pi [-n|--iterations N] [-w|--workers N|auto] [-s|--seed U64]
//!                [-b|--backend threads|pool|tasks] [-h|--help]
//! ```

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;

use crate::error::{EstimateError, Result};
use crate::sampler;

/// Iterations per estimator when none are given.
pub const DEFAULT_ITERATIONS: i64 = 10_000_000_000;

/// Workers in the parallel estimator when none are given.
pub const DEFAULT_WORKERS: usize = 8;

/// Largest worker count accepted. Each worker is an OS thread.
pub const MAX_WORKERS: usize = 1024;

/// Where the base seed of a run comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedSource {
    /// Nanoseconds since the UNIX epoch, read once per resolution.
    #[default]
    Clock,
    /// A fixed seed for reproducible runs.
    Fixed(u64),
}

impl SeedSource {
    pub fn resolve(self) -> u64 {
        match self {
            SeedSource::Clock => sampler::clock_seed(),
            SeedSource::Fixed(seed) => seed,
        }
    }
}

/// Fan-out/fan-in mechanism used by the parallel estimator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// One named OS thread per worker, joined explicitly.
    #[default]
    Threads,
    /// A dedicated rayon pool sized to the worker count.
    Pool,
    /// Blocking tasks on a tokio runtime.
    Tasks,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Threads, Backend::Pool, Backend::Tasks];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Threads => "threads",
            Backend::Pool => "pool",
            Backend::Tasks => "tasks",
        }
    }

    /// Whether this build can run the backend.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Threads | Backend::Pool => true,
            Backend::Tasks => cfg!(feature = "async"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "threads" | "thread" => Ok(Backend::Threads),
            "pool" | "rayon" => Ok(Backend::Pool),
            "tasks" | "tokio" | "async" => Ok(Backend::Tasks),
            _ => Err(EstimateError::UnknownBackend(s.to_string())),
        }
    }
}

/// Settings shared by both estimators for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EstimatorConfig {
    pub iterations: i64,
    pub workers: usize,
    pub seed: SeedSource,
    pub backend: Backend,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            iterations: DEFAULT_ITERATIONS,
            workers: DEFAULT_WORKERS,
            seed: SeedSource::Clock,
            backend: Backend::Threads,
        }
    }
}

impl EstimatorConfig {
    pub fn with_iterations(mut self, iterations: i64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = SeedSource::Fixed(seed);
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Rejects settings that would make the estimate meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.iterations <= 0 {
            return Err(EstimateError::InvalidIterations(self.iterations));
        }
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(EstimateError::InvalidWorkers(self.workers));
        }
        if !self.backend.is_available() {
            return Err(EstimateError::BackendUnavailable(self.backend.name()));
        }
        Ok(())
    }
}

/// Worker count matching the machine, falling back to [`DEFAULT_WORKERS`].
pub fn available_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(DEFAULT_WORKERS)
}

/// What the command line asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Run(EstimatorConfig),
    Help,
}

/// Parses the arguments that follow the program name.
///
/// The returned configuration has already been validated.
pub fn parse_args<I, S>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut config = EstimatorConfig::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-n" | "--iterations" => {
                let value = value_for(&args, i)?;
                config.iterations = parse_number(flag, value)?;
                i += 1;
            }
            "-w" | "--workers" => {
                let value = value_for(&args, i)?;
                config.workers = if value.eq_ignore_ascii_case("auto") {
                    available_workers()
                } else {
                    parse_number(flag, value)?
                };
                i += 1;
            }
            "-s" | "--seed" => {
                let value = value_for(&args, i)?;
                config.seed = SeedSource::Fixed(parse_number(flag, value)?);
                i += 1;
            }
            "-b" | "--backend" => {
                config.backend = value_for(&args, i)?.parse()?;
                i += 1;
            }
            other => return Err(EstimateError::UnknownFlag(other.to_string())),
        }
        i += 1;
    }

    config.validate()?;
    Ok(Invocation::Run(config))
}

fn value_for(args: &[String], i: usize) -> Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| EstimateError::MissingValue(args[i].clone()))
}

// Accepts `_` digit separators, e.g. `10_000_000`.
fn parse_number<T: FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .replace('_', "")
        .parse()
        .map_err(|_| EstimateError::InvalidArgument {
            flag: flag.to_string(),
            value: value.to_string(),
        })
}

/// Usage text for `--help` and argument errors.
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [OPTIONS]\n\
         \n\
         Estimates pi by Monte Carlo sampling, sequentially and in parallel.\n\
         \n\
         Options:\n\
         \x20 -n, --iterations <N>       Samples per estimator (default: {DEFAULT_ITERATIONS})\n\
         \x20 -w, --workers <N|auto>     Parallel workers (default: {DEFAULT_WORKERS})\n\
         \x20 -s, --seed <U64>           Fixed base seed (default: system clock)\n\
         \x20 -b, --backend <NAME>       threads, pool or tasks (default: threads)\n\
         \x20 -h, --help                 Show this help"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> EstimatorConfig {
        match parse_args(args.iter().copied()).unwrap() {
            Invocation::Run(config) => config,
            Invocation::Help => panic!("expected a run configuration"),
        }
    }

    #[test]
    fn no_arguments_gives_reference_run() {
        let config = run(&[]);
        assert_eq!(config, EstimatorConfig::default());
        assert_eq!(config.iterations, 10_000_000_000);
        assert_eq!(config.workers, 8);
        assert_eq!(config.seed, SeedSource::Clock);
        assert_eq!(config.backend, Backend::Threads);
    }

    #[test]
    fn every_flag_is_parsed() {
        let config = run(&["-n", "1_000_000", "--workers", "3", "-s", "99", "--backend", "pool"]);
        assert_eq!(config.iterations, 1_000_000);
        assert_eq!(config.workers, 3);
        assert_eq!(config.seed, SeedSource::Fixed(99));
        assert_eq!(config.backend, Backend::Pool);
    }

    #[test]
    fn auto_workers_uses_machine_parallelism() {
        let config = run(&["--workers", "AUTO"]);
        assert_eq!(config.workers, available_workers());
        assert!(config.workers > 0);
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse_args(["-n", "5", "--help"]).unwrap(), Invocation::Help);
        assert!(usage("pi").contains("--backend"));
    }

    #[test]
    fn rejects_non_positive_iterations() {
        assert!(matches!(
            parse_args(["-n", "0"]),
            Err(EstimateError::InvalidIterations(0))
        ));
        assert!(matches!(
            parse_args(["--iterations", "-20"]),
            Err(EstimateError::InvalidIterations(-20))
        ));
    }

    #[test]
    fn rejects_malformed_arguments() {
        assert!(matches!(parse_args(["-w", "0"]), Err(EstimateError::InvalidWorkers(0))));
        assert!(matches!(
            parse_args(["-w", "lots"]),
            Err(EstimateError::InvalidArgument { .. })
        ));
        assert!(matches!(parse_args(["--seed"]), Err(EstimateError::MissingValue(f)) if f == "--seed"));
        assert!(matches!(parse_args(["--fast"]), Err(EstimateError::UnknownFlag(_))));
        assert!(matches!(parse_args(["-b", "gpu"]), Err(EstimateError::UnknownBackend(_))));
    }

    #[test]
    fn rejects_oversized_worker_count() {
        assert!(matches!(
            parse_args(["-n", "100", "-w", "1099511627776"]),
            Err(EstimateError::InvalidWorkers(1_099_511_627_776))
        ));
        let ceiling = MAX_WORKERS.to_string();
        assert!(parse_args(["-n", "100", "-w", ceiling.as_str()]).is_ok());
    }

    #[test]
    fn backend_names_round_trip() {
        for backend in Backend::ALL {
            assert_eq!(backend.name().parse::<Backend>().unwrap(), backend);
            assert_eq!(backend.to_string(), backend.name());
        }
        assert_eq!("rayon".parse::<Backend>().unwrap(), Backend::Pool);
    }

    #[test]
    fn fixed_seed_resolves_to_itself() {
        assert_eq!(SeedSource::Fixed(1234).resolve(), 1234);
    }

    #[test]
    fn validate_checks_iterations_and_workers() {
        let config = EstimatorConfig::default().with_iterations(100).with_workers(2);
        assert!(config.validate().is_ok());
        assert!(config.clone().with_iterations(0).validate().is_err());
        assert!(config.with_workers(0).validate().is_err());
    }
}
