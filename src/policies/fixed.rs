//! # Fixed delay ("no backoff").
//!
//! Waits the same configured delay before every retry, independent of history.

use std::time::Duration;

use serde::Deserialize;

use crate::core::config::millis;

/// Constant delay between attempts.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::FixedBackoff;
///
/// let fixed = FixedBackoff { delay: Duration::from_millis(250) };
/// assert_eq!(fixed.next(1), Duration::from_millis(250));
/// assert_eq!(fixed.next(40), Duration::from_millis(250));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixedBackoff {
    /// Delay before every retry (`0` = retry immediately).
    #[serde(rename = "delay_ms", with = "millis")]
    pub delay: Duration,
}

impl Default for FixedBackoff {
    /// `delay = 1s`.
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
        }
    }
}

impl FixedBackoff {
    /// Returns the configured delay; `attempt` is ignored.
    pub fn next(&self, _attempt: u32) -> Duration {
        self.delay
    }
}
