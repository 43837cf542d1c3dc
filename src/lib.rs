//! # retryvisor
//!
//! **Retryvisor** is a small retry engine for Rust.
//!
//! It runs a unit of work repeatedly until it succeeds, a continuation policy
//! gives up, or a cancellation token fires. Between attempts it waits for a
//! delay computed by a pluggable backoff policy.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐
//!  │ Work (async  │    │  RetryPlan   │    │  CancellationToken   │
//!  │ or blocking) │    │ predicate    │    │ (caller-owned)       │
//!  └──────┬───────┘    │ classifier   │    └──────────┬───────────┘
//!         │            │ backoff      │               │
//!         │            │ max_attempts │               │
//!         │            └──────┬───────┘               │
//!         ▼                   ▼                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Retrier (RetryConfig + SubscriberSet)                            │
//! │  execute / run_until / run / execute_blocking / run_blocking      │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                            retry_loop (one per invocation)
//!                                   │ Retrying / GivingUp / Canceled
//!                                   ▼
//!                            SubscriberSet ──► LogWriter, custom subscribers
//! ```
//!
//! ### Lifecycle
//! ```text
//! k = 1
//! loop {
//!   ├─► cancelled? ─► Canceled{k-1}
//!   ├─► work.attempt()
//!   │       ├─ Ok  ──► return value
//!   │       └─ Err ──► cancelled? ─► Canceled{k}
//!   │                  ├─ give up = (k > max || !predicate) && !transient
//!   │                  │      └─► publish GivingUp, return Failed{k, failure}
//!   │                  ├─ delay = backoff.delay(k, failure)
//!   │                  ├─ publish Retrying{k, delay}
//!   │                  └─ sleep(delay) (cancellable) ─► Canceled{k}
//!   └─► k += 1
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Engine**        | Retry loop entry points, async and blocking.                 | [`Retrier`], [`RetryPlan`]                  |
//! | **Policies**      | Fixed, linear and jittered exponential backoff.              | [`Backoff`], [`BackoffPolicy`], [`Jitter`]  |
//! | **Work**          | Repeatable units of work.                                    | [`Work`], [`WorkFn`], [`BlockingFn`]        |
//! | **Classification**| Failures that are retried regardless of the attempt ceiling. | [`Transient`], [`WorkError`]                |
//! | **Subscriber API**| Observe retry decisions (logging, metrics, custom).         | [`Subscribe`], [`LogWriter`], [`Event`]     |
//! | **Errors**        | Typed outcomes of failed invocations.                        | [`RetryError`], [`ConfigError`]             |
//! | **Configuration** | Defaults loaded from TOML.                                   | [`RetryConfig`]                             |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{LinearBackoff, LogWriter, Retrier, RetryConfig, WorkError, WorkFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = RetryConfig::from_toml_str(
//!         r#"
//!         max_attempts = 3
//!         default_backoff = "fixed"
//!         fixed = { delay_ms = 1 }
//!         "#,
//!     )?;
//!     let retrier = Retrier::try_new(cfg)?.with_subscriber(Arc::new(LogWriter));
//!
//!     let mut left = 2;
//!     let work = WorkFn::new(move || {
//!         left -= 1;
//!         let fail = left > 0;
//!         async move {
//!             if fail {
//!                 Err(WorkError::fail("upstream busy"))
//!             } else {
//!                 Ok("synced")
//!             }
//!         }
//!     });
//!
//!     let plan = retrier
//!         .plan_if(|e: &WorkError| !matches!(e, WorkError::Fatal { .. }))
//!         .backoff(LinearBackoff { increment: Duration::from_millis(1), max_count: 3 })
//!         .named("sync");
//!
//!     let out = retrier.execute(work, plan, &CancellationToken::new()).await?;
//!     assert_eq!(out, "synced");
//!     Ok(())
//! }
//! ```
mod classify;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod work;

// ---- Public re-exports ----

pub use classify::Transient;
pub use core::{Retrier, RetryConfig, RetryPlan};
pub use error::{ConfigError, RetryError, WorkError};
pub use events::{Event, EventKind};
pub use policies::{
    Backoff, BackoffKind, BackoffPolicy, ExponentialBackoff, FixedBackoff, Jitter, LinearBackoff,
    MAX_EXPONENT,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use work::{BlockingFn, Work, WorkFn};
