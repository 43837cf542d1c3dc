//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for plugging loggers, metrics or
//! custom handlers into the retry loop.
//!
//! ## Rules
//! - `on_event` is called **inline** by the retry loop, between attempts.
//!   Keep it cheap: format, count, forward to a channel. Do not block on I/O.
//! - Panics are caught by [`SubscriberSet`](crate::SubscriberSet); they never abort
//!   the retry invocation.
//! - Events of one invocation arrive in attempt order.

use crate::events::Event;

/// Event subscriber for retry observability.
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in diagnostics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
