//! Point sampling in the 2×2 square and unit-circle classification.
//!
//! Every estimator, sequential or parallel, runs the same kernel:
//! [`count_inside`] over a stream created by [`stream`]. Streams are plain
//! owned values; a worker builds its own and nothing else ever touches it.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generator used for every sampling stream.
pub type Stream = ChaCha8Rng;

/// Builds the stream for `stream_id` under `base_seed`.
///
/// Streams sharing a base seed but differing in id produce independent
/// sequences, so workers started in the same clock tick never collide.
pub fn stream(base_seed: u64, stream_id: u64) -> Stream {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(stream_id);
    rng
}

/// Base seed taken from the wall clock.
pub fn clock_seed() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        // Low 64 bits of the nanosecond count; the high bits barely move.
        Ok(elapsed) => elapsed.as_nanos() as u64,
        Err(err) => {
            tracing::warn!("system clock is before the UNIX epoch ({}), seeding with 0", err);
            0
        }
    }
}

/// A point in the square `[-1, 1) × [-1, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn distance_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Inside the unit circle, boundary included.
    #[inline]
    pub fn is_inside(&self) -> bool {
        self.distance_squared() <= 1.0
    }
}

/// Samples uniformly from the square `[-1, 1) × [-1, 1)`.
///
/// `x` is drawn before `y`, two draws per point.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitSquare;

impl Distribution<Point> for UnitSquare {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let coord = Uniform::new(-1.0f64, 1.0);
        let x = coord.sample(rng);
        let y = coord.sample(rng);
        Point { x, y }
    }
}

/// Draws one point from `rng`.
#[inline]
pub fn sample_point<R: Rng + ?Sized>(rng: &mut R) -> Point {
    UnitSquare.sample(rng)
}

/// Draws `samples` points and returns how many land inside the circle.
///
/// Non-positive `samples` draws nothing and returns 0.
pub fn count_inside<R: Rng + ?Sized>(rng: &mut R, samples: i64) -> i64 {
    let mut inside = 0i64;
    for _ in 0..samples {
        if sample_point(rng).is_inside() {
            inside += 1;
        }
    }
    inside
}
