//! # Work abstraction.
//!
//! This module defines the [`Work`] trait: a unit of work the engine can run
//! repeatedly, producing a fresh attempt on every call.
//!
//! One trait covers every execution model:
//! - asynchronous work, via [`WorkFn`](crate::WorkFn) (closure returning a future);
//! - blocking work, via [`BlockingFn`](crate::BlockingFn) (closure returning a result);
//! - value-returning or unit work, via `T` (use `T = ()` for work without a result).
//!
//! The engine awaits each attempt to completion before deciding what to do next;
//! it never polls two attempts at once.

use std::future::Future;

/// # Repeatable unit of work.
///
/// # Example
/// ```
/// use retryvisor::{Work, WorkError};
///
/// struct Ping {
///     calls: u32,
/// }
///
/// impl Work<u32, WorkError> for Ping {
///     fn attempt(&mut self) -> impl Future<Output = Result<u32, WorkError>> + Send {
///         self.calls += 1;
///         let calls = self.calls;
///         async move {
///             if calls < 2 {
///                 Err(WorkError::transient("warming up"))
///             } else {
///                 Ok(calls)
///             }
///         }
///     }
/// }
/// ```
pub trait Work<T, E>: Send {
    /// Starts one attempt.
    fn attempt(&mut self) -> impl Future<Output = Result<T, E>> + Send;
}
