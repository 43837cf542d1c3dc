//! # Event subscribers for the retry engine.
//!
//! This module provides the [`Subscribe`] trait and the built-in [`LogWriter`]
//! for observing the decisions of the retry loop.
//!
//! ## Architecture
//! ```text
//! retry_loop ── emit(|| Event) ──► SubscriberSet ──► Subscribe::on_event(&Event)
//!                                       │                 │
//!                                       │            ┌────┴────┬─────────┐
//!                                       │            ▼         ▼         ▼
//!                                       │        LogWriter  Metrics   Custom
//!                                       │
//!                                       └── empty set: the event is never built
//! ```
//!
//! ## Implementing custom subscribers
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use retryvisor::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct RetryCounter(AtomicU64);
//!
//! impl Subscribe for RetryCounter {
//!     fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::Retrying {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "retry-counter"
//!     }
//! }
//! ```

mod log;
mod set;
mod subscriber;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
