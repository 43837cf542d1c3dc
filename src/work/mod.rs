//! # Work abstractions.
//!
//! This module provides the work-related types:
//! - [`Work`] - trait for a repeatable unit of work (async or blocking)
//! - [`WorkFn`] - async closure-backed implementation
//! - [`BlockingFn`] - blocking closure-backed implementation

mod work;
mod work_fn;

pub use work::Work;
pub use work_fn::{BlockingFn, WorkFn};
