//! # Jitter for retry delays.
//!
//! [`Jitter`] scales a delay by a factor drawn uniformly from `[1 - spread, 1 + spread]`,
//! so that many callers failing at the same moment do not retry in lockstep.
//!
//! Randomness comes from `rand::rng()`, a lazily-initialized generator local to the
//! calling thread: concurrent retry loops never contend on (or race over) a shared source.

use rand::Rng;
use std::time::Duration;

/// Symmetric multiplicative jitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jitter {
    spread: f64,
}

impl Jitter {
    /// ±20%, the spread used by [`ExponentialBackoff`](crate::ExponentialBackoff).
    pub const STANDARD: Jitter = Jitter { spread: 0.2 };

    /// Creates a jitter with the given spread, clamped to `[0, 1]`.
    pub fn new(spread: f64) -> Self {
        let spread = if spread.is_finite() {
            spread.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { spread }
    }

    /// Returns the configured spread.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Applies jitter using the thread-local generator.
    pub fn apply(&self, base: Duration) -> Duration {
        self.apply_with(base, &mut rand::rng())
    }

    /// Applies jitter using the given generator.
    pub fn apply_with<R: Rng>(&self, base: Duration, rng: &mut R) -> Duration {
        if self.spread == 0.0 || base.is_zero() {
            return base;
        }
        let factor = rng.random_range((1.0 - self.spread)..=(1.0 + self.spread));
        Duration::try_from_secs_f64(base.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Jitter::STANDARD
    }
}
