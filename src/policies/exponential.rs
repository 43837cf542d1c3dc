//! # Jittered exponential backoff.
//!
//! For attempt `n` the delay is `0.5 × (2^c − 1) × j` where:
//! - `c = clamp(n, 1, max_count)`, so long failure streaks stop growing the delay;
//! - `j` is `base` scaled by [`Jitter::STANDARD`] (uniform in `[0.8 × base, 1.2 × base]`),
//!   drawn again on **every** call.
//!
//! The result is truncated to whole milliseconds and never drops below 1ms.
//!
//! ```text
//! base = 1s        c=1      c=2      c=3      c=4       c=5       c=6
//! 0.5 × (2^c − 1)  0.5      1.5      3.5      7.5       15.5      31.5
//! delay (±20%)     0.5s     1.5s     3.5s     7.5s      15.5s     31.5s
//! ```

use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::{core::config::millis, policies::jitter::Jitter};

/// Largest exponent the formula evaluates; keeps `2^c` inside `u64`.
pub const MAX_EXPONENT: u32 = 62;

/// Exponentially growing, jittered delay with a clamp on the exponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExponentialBackoff {
    /// Increment the jitter is applied to.
    #[serde(rename = "base_ms", with = "millis")]
    pub base: Duration,
    /// Largest attempt number fed into the exponent.
    pub max_count: u32,
}

impl Default for ExponentialBackoff {
    /// `base = 1s`, `max_count = 6`.
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            max_count: 6,
        }
    }
}

impl ExponentialBackoff {
    /// Computes the delay for the given attempt using the thread-local generator.
    pub fn next(&self, attempt: u32) -> Duration {
        self.next_with(attempt, &mut rand::rng())
    }

    /// Computes the delay for the given attempt using `rng` for jitter.
    ///
    /// Always returns at least 1ms.
    pub fn next_with<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let exponent = attempt.clamp(1, self.max_count.clamp(1, MAX_EXPONENT));
        let increment = Jitter::STANDARD.apply_with(self.base, rng);

        let factor = 0.5 * ((1u64 << exponent) - 1) as f64;
        // `as` saturates for out-of-range floats.
        let millis = (factor * increment.as_secs_f64() * 1000.0) as u64;
        Duration::from_millis(millis.max(1))
    }
}
