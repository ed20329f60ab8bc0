//! Monte Carlo estimation of π.
//!
//! Points are drawn uniformly from the 2×2 square centred on the origin; the
//! fraction landing inside the unit circle approaches π/4. The estimate is
//! computed once on a single thread and once across a pool of workers, each
//! with its own generator stream and private counter, and the two runs are
//! timed against each other.
//!
//! Diagnostics are emitted as `tracing` events (run start, each finished
//! worker, each finished estimate, a clock-before-epoch seed fallback). The
//! crate never installs a subscriber; the `monte-carlo-pi` binary prints only
//! its report, so the events are for programs embedding the library.
//!
//! ```no_run
//! use monte_carlo_pi::{driver, EstimatorConfig};
//!
//! let config = EstimatorConfig::default().with_iterations(10_000_000).with_seed(7);
//! let report = driver::run(&config, &mut std::io::stdout()).unwrap();
//! println!("speedup {:.2}", report.speedup());
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod monte_carlo;
pub mod partition;
pub mod sampler;

pub use config::{Backend, EstimatorConfig, SeedSource};
pub use error::{EstimateError, Result};
pub use monte_carlo::{Estimate, ParallelEstimator, WorkerReport};
