//! Backoff policies.
//!
//! This module groups the knobs that control **how long** to wait between attempts.
//!
//! ## Contents
//! - [`Backoff`]            the policy abstraction (built-ins and closures)
//! - [`BackoffPolicy`]      built-in policies behind one enum
//! - [`FixedBackoff`]       constant delay ("no backoff")
//! - [`LinearBackoff`]      `min(attempt, max_count) × increment`
//! - [`ExponentialBackoff`] jittered `0.5 × (2^c − 1) × base`, exponent clamped
//! - [`Jitter`]             ±spread randomization to avoid thundering herd
//!
//! ## Quick wiring
//! ```text
//! RetryPlan { backoff: Box<dyn Backoff<E>>, .. }
//!      └─► core::run::retry_loop calls backoff.delay(k, &failure) after each retryable failure
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → exponential, base=1s, max_count=6.
//! - `FixedBackoff::default()`  → delay=1s.
//! - `LinearBackoff::default()` → increment=1s, max_count=10.

mod backoff;
mod exponential;
mod fixed;
mod jitter;
mod linear;

pub use backoff::{Backoff, BackoffKind, BackoffPolicy};
pub use exponential::{ExponentialBackoff, MAX_EXPONENT};
pub use fixed::FixedBackoff;
pub use jitter::Jitter;
pub use linear::LinearBackoff;
