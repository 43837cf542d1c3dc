//! # Closure-backed work (`WorkFn`, `BlockingFn`)
//!
//! [`WorkFn`] wraps a closure `F: FnMut() -> Fut`, producing a fresh future per attempt.
//! [`BlockingFn`] wraps a closure `F: FnMut() -> Result<T, E>` that runs to completion
//! on the calling thread when the attempt starts.
//!
//! ## Concurrency semantics
//! - Each attempt creates a **new** future owning its own state.
//! - State shared across attempts lives in the closure (`FnMut`) or behind an explicit `Arc`.
//!
//! ## Example
//! ```rust
//! use retryvisor::{BlockingFn, WorkError, WorkFn};
//!
//! let fetch = WorkFn::new(|| async { Ok::<_, WorkError>("payload") });
//! let parse = BlockingFn::new(|| "42".parse::<u32>());
//! # let _ = (fetch, parse);
//! ```

use std::future::{self, Future};

use crate::work::Work;

/// Async closure-backed work.
#[derive(Debug, Clone)]
pub struct WorkFn<F> {
    f: F,
}

impl<F> WorkFn<F> {
    /// Wraps a closure returning a future.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut, T, E> Work<T, E> for WorkFn<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<T, E>> + Send,
{
    fn attempt(&mut self) -> impl Future<Output = Result<T, E>> + Send {
        (self.f)()
    }
}

/// Blocking closure-backed work.
///
/// The closure runs when the attempt is started, on the thread driving the retry loop.
/// Inside an async runtime this blocks that worker thread for the duration of the call.
#[derive(Debug, Clone)]
pub struct BlockingFn<F> {
    f: F,
}

impl<F> BlockingFn<F> {
    /// Wraps a closure returning a result.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, T, E> Work<T, E> for BlockingFn<F>
where
    F: FnMut() -> Result<T, E> + Send,
    T: Send,
    E: Send,
{
    fn attempt(&mut self) -> impl Future<Output = Result<T, E>> + Send {
        future::ready((self.f)())
    }
}
