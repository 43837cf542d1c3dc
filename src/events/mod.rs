//! Retry events.
//!
//! This module holds the event **data model** describing each decision of the retry loop.
//! Events are handed synchronously to the subscribers registered on a
//! [`Retrier`](crate::Retrier); nothing is buffered or persisted.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata

mod event;

pub use event::{Event, EventKind};
