//! Error types for the estimators and the command line.

use std::io;

use thiserror::Error;

/// Everything that can stop an estimate from being produced.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// The iteration count must be strictly positive.
    #[error("iteration count must be positive, got {0}")]
    InvalidIterations(i64),

    /// At least one worker is required.
    #[error("worker count must be positive, got {0}")]
    InvalidWorkers(usize),

    /// A flag was given a value that does not parse.
    #[error("invalid value '{value}' for {flag}")]
    InvalidArgument {
        /// The flag as written on the command line.
        flag: String,
        /// The rejected value.
        value: String,
    },

    /// A flag that takes a value was last on the command line.
    #[error("missing value for {0}")]
    MissingValue(String),

    /// An argument nobody recognises.
    #[error("unknown argument '{0}'")]
    UnknownFlag(String),

    /// Backend name not one of `threads`, `pool`, `tasks`.
    #[error("unknown backend '{0}', expected threads, pool or tasks")]
    UnknownBackend(String),

    /// The backend was compiled out.
    #[error("backend '{0}' is not available in this build")]
    BackendUnavailable(&'static str),

    /// The OS refused to create a worker thread or runtime.
    #[error("failed to start worker {worker}: {source}")]
    WorkerSpawn {
        /// Index of the worker that could not be started.
        worker: usize,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The rayon pool could not be built.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    /// The async runtime hosting the blocking tasks could not be built.
    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] io::Error),

    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    /// A worker died before finishing its range.
    #[error("worker {worker} panicked before finishing its range")]
    WorkerPanicked {
        /// Index of the failed worker.
        worker: usize,
    },

    /// Partition or reduction arithmetic left the `i64` range.
    #[error("arithmetic overflow in partition or reduction")]
    Overflow,
}

impl EstimateError {
    /// True for errors caused by bad input rather than by the run itself.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            EstimateError::InvalidIterations(_)
                | EstimateError::InvalidWorkers(_)
                | EstimateError::InvalidArgument { .. }
                | EstimateError::MissingValue(_)
                | EstimateError::UnknownFlag(_)
                | EstimateError::UnknownBackend(_)
                | EstimateError::BackendUnavailable(_)
        )
    }
}

/// Result type for estimator operations.
pub type Result<T> = std::result::Result<T, EstimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_classified() {
        assert!(EstimateError::InvalidIterations(0).is_config());
        assert!(EstimateError::UnknownBackend("gpu".into()).is_config());
        assert!(!EstimateError::Overflow.is_config());
        assert!(!EstimateError::WorkerPanicked { worker: 3 }.is_config());
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = EstimateError::InvalidArgument {
            flag: "--workers".into(),
            value: "many".into(),
        };
        assert_eq!(err.to_string(), "invalid value 'many' for --workers");
        assert_eq!(
            EstimateError::InvalidIterations(-5).to_string(),
            "iteration count must be positive, got -5"
        );
    }
}
