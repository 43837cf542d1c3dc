//! # Backoff abstraction.
//!
//! [`Backoff`] maps `(attempt, last failure)` to the delay before the next attempt.
//! It is implemented by:
//! - [`BackoffPolicy`] and each built-in policy struct (failure ignored);
//! - any closure `Fn(u32, &E) -> Duration + Send + Sync`, for caller-supplied policies.
//!
//! `Duration` cannot be negative, so the worst a custom policy can return is
//! `Duration::ZERO`, which the engine treats as "retry immediately".
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Backoff, BackoffPolicy, LinearBackoff, WorkError};
//!
//! let linear = BackoffPolicy::Linear(LinearBackoff {
//!     increment: Duration::from_millis(50),
//!     max_count: 4,
//! });
//! assert_eq!(Backoff::<WorkError>::delay(&linear, 2, &WorkError::fail("x")), Duration::from_millis(100));
//!
//! // Custom policy: back off longer on fatal-looking failures.
//! let custom = |attempt: u32, err: &WorkError| match err {
//!     WorkError::Fatal { .. } => Duration::from_secs(5),
//!     _ => Duration::from_millis(10) * attempt,
//! };
//! assert_eq!(custom.delay(3, &WorkError::fail("x")), Duration::from_millis(30));
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::policies::{exponential::ExponentialBackoff, fixed::FixedBackoff, linear::LinearBackoff};

/// Computes the delay before the next attempt.
///
/// Must be callable repeatedly and concurrently from independent retry loops.
pub trait Backoff<E>: Send + Sync {
    /// Returns the delay to wait after `attempt` (1-based) failed with `failure`.
    fn delay(&self, attempt: u32, failure: &E) -> Duration;
}

impl<E, F> Backoff<E> for F
where
    F: Fn(u32, &E) -> Duration + Send + Sync,
{
    fn delay(&self, attempt: u32, failure: &E) -> Duration {
        self(attempt, failure)
    }
}

/// Built-in backoff policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackoffPolicy {
    /// Constant delay.
    Fixed(FixedBackoff),
    /// `min(attempt, max_count) × increment`.
    Linear(LinearBackoff),
    /// Jittered `0.5 × (2^c − 1) × base`, exponent clamped.
    Exponential(ExponentialBackoff),
}

impl Default for BackoffPolicy {
    /// Returns [`BackoffPolicy::Exponential`] with default parameters.
    fn default() -> Self {
        BackoffPolicy::Exponential(ExponentialBackoff::default())
    }
}

impl BackoffPolicy {
    /// Computes the delay for the given attempt (1-based).
    pub fn next(&self, attempt: u32) -> Duration {
        match self {
            BackoffPolicy::Fixed(p) => p.next(attempt),
            BackoffPolicy::Linear(p) => p.next(attempt),
            BackoffPolicy::Exponential(p) => p.next(attempt),
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> BackoffKind {
        match self {
            BackoffPolicy::Fixed(_) => BackoffKind::Fixed,
            BackoffPolicy::Linear(_) => BackoffKind::Linear,
            BackoffPolicy::Exponential(_) => BackoffKind::Exponential,
        }
    }
}

impl<E> Backoff<E> for BackoffPolicy {
    fn delay(&self, attempt: u32, _failure: &E) -> Duration {
        self.next(attempt)
    }
}

impl<E> Backoff<E> for FixedBackoff {
    fn delay(&self, attempt: u32, _failure: &E) -> Duration {
        self.next(attempt)
    }
}

impl<E> Backoff<E> for LinearBackoff {
    fn delay(&self, attempt: u32, _failure: &E) -> Duration {
        self.next(attempt)
    }
}

impl<E> Backoff<E> for ExponentialBackoff {
    fn delay(&self, attempt: u32, _failure: &E) -> Duration {
        self.next(attempt)
    }
}

impl From<FixedBackoff> for BackoffPolicy {
    fn from(p: FixedBackoff) -> Self {
        BackoffPolicy::Fixed(p)
    }
}

impl From<LinearBackoff> for BackoffPolicy {
    fn from(p: LinearBackoff) -> Self {
        BackoffPolicy::Linear(p)
    }
}

impl From<ExponentialBackoff> for BackoffPolicy {
    fn from(p: ExponentialBackoff) -> Self {
        BackoffPolicy::Exponential(p)
    }
}

/// Names a [`BackoffPolicy`] variant (used in configuration).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// [`BackoffPolicy::Fixed`]; also accepted as `none` in config files.
    #[serde(alias = "none")]
    Fixed,
    /// [`BackoffPolicy::Linear`].
    Linear,
    /// [`BackoffPolicy::Exponential`].
    #[default]
    Exponential,
}
