//! # Linear backoff.
//!
//! The delay for attempt `n` is `min(n, max_count) × increment`: it grows by one
//! increment per failure and stops growing after `max_count` attempts.

use std::time::Duration;

use serde::Deserialize;

use crate::core::config::millis;

/// Linearly growing delay with a cap on the multiplier.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::LinearBackoff;
///
/// let linear = LinearBackoff { increment: Duration::from_millis(100), max_count: 3 };
/// assert_eq!(linear.next(1), Duration::from_millis(100));
/// assert_eq!(linear.next(3), Duration::from_millis(300));
/// assert_eq!(linear.next(9), Duration::from_millis(300));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinearBackoff {
    /// Delay added per attempt.
    #[serde(rename = "increment_ms", with = "millis")]
    pub increment: Duration,
    /// Attempt number after which the delay stops growing.
    pub max_count: u32,
}

impl Default for LinearBackoff {
    /// `increment = 1s`, `max_count = 10`.
    fn default() -> Self {
        Self {
            increment: Duration::from_secs(1),
            max_count: 10,
        }
    }
}

impl LinearBackoff {
    /// Computes the delay for the given attempt (1-based). Saturates instead of overflowing.
    pub fn next(&self, attempt: u32) -> Duration {
        self.increment.saturating_mul(attempt.min(self.max_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_then_caps() {
        let linear = LinearBackoff {
            increment: Duration::from_millis(200),
            max_count: 5,
        };
        for attempt in 1..=20u32 {
            let expected = Duration::from_millis(200) * attempt.min(5);
            assert_eq!(linear.next(attempt), expected, "attempt {attempt}");
        }
    }

    #[test]
    fn non_decreasing() {
        let linear = LinearBackoff::default();
        let mut prev = Duration::ZERO;
        for attempt in 1..=30u32 {
            let d = linear.next(attempt);
            assert!(d >= prev, "attempt {attempt}: {d:?} < {prev:?}");
            prev = d;
        }
    }

    #[test]
    fn huge_values_saturate() {
        let linear = LinearBackoff {
            increment: Duration::MAX,
            max_count: u32::MAX,
        };
        assert_eq!(linear.next(u32::MAX), Duration::MAX);
    }
}
