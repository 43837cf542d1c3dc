//! # SubscriberSet: lazy fan-out over multiple subscribers
//!
//! [`SubscriberSet`] delivers each [`Event`] to every registered subscriber.
//!
//! ## What it guarantees
//! - `emit(|| Event)` builds the event **only** if at least one subscriber is registered,
//!   so an engine without subscribers pays nothing for diagnostics.
//! - Subscribers are called in registration order.
//! - Panics inside subscribers are caught and logged (isolation); the remaining
//!   subscribers still receive the event.
//!
//! ## Diagram
//! ```text
//!    emit(|| Event)
//!        │  (empty set → return, closure never called)
//!        ├──► S1.on_event(&ev)   catch_unwind
//!        ├──► S2.on_event(&ev)   catch_unwind
//!        └──► SN.on_event(&ev)   catch_unwind
//! ```
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::events::Event;

use super::Subscribe;

/// Ordered collection of subscribers.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Appends a subscriber.
    pub fn push(&mut self, sub: Arc<dyn Subscribe>) {
        self.subs.push(sub);
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Returns `true` if no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Builds the event with `make` and delivers it to every subscriber.
    ///
    /// `make` is not called when the set is empty.
    pub fn emit(&self, make: impl FnOnce() -> Event) {
        if self.subs.is_empty() {
            return;
        }
        let event = make();
        for sub in &self.subs {
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(|| sub.on_event(&event))) {
                let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                };
                tracing::warn!(
                    target: "retryvisor",
                    subscriber = sub.name(),
                    info = %info,
                    "subscriber panicked"
                );
            }
        }
    }
}

impl std::fmt::Debug for SubscriberSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.subs.iter().map(|s| s.name()))
            .finish()
    }
}
