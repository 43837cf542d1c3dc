//! # Diagnostic events emitted by the retry loop.
//!
//! The [`EventKind`] enum classifies the decisions taken at each attempt boundary:
//! - [`EventKind::Retrying`]: a failure will be retried after a delay;
//! - [`EventKind::GivingUp`]: a failure is final and is returned to the caller;
//! - [`EventKind::Canceled`]: the cancellation token stopped the loop.
//!
//! The [`Event`] struct carries the metadata: timestamp, attempt number, delay,
//! failure message and the optional operation name set on the plan.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Within one invocation events are produced in attempt order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Retrying)
//!     .with_operation("fetch-user")
//!     .with_reason("connection reset")
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(1500));
//!
//! assert_eq!(ev.kind, EventKind::Retrying);
//! assert_eq!(ev.operation.as_deref(), Some("fetch-user"));
//! assert_eq!(ev.delay_ms, Some(1500));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use tracing::Level;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of retry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// An attempt failed and another one is scheduled.
    ///
    /// Sets:
    /// - `attempt`: number of the attempt that failed
    /// - `delay_ms`: delay before the next attempt
    /// - `reason`: failure message
    /// - `transient`: whether the failure was classified as transient
    Retrying,

    /// An attempt failed and the engine gave up; the failure is returned to the caller.
    ///
    /// Sets:
    /// - `attempt`: number of the last attempt
    /// - `reason`: failure message
    /// - `transient`: always `false`
    GivingUp,

    /// The cancellation token fired before an attempt or during a wait.
    ///
    /// Sets:
    /// - `attempt`: number of attempts executed so far
    Canceled,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Retrying => "retrying",
            EventKind::GivingUp => "giving_up",
            EventKind::Canceled => "canceled",
        }
    }
}

/// Retry event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Attempt number (starting from 1).
    pub attempt: Option<u32>,
    /// Delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Failure message.
    pub reason: Option<Arc<str>>,
    /// Whether the failure was classified as transient.
    pub transient: Option<bool>,
    /// Name of the retried operation, if the plan has one.
    pub operation: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            attempt: None,
            delay_ms: None,
            reason: None,
            transient: None,
            operation: None,
        }
    }

    /// Attaches a failure message.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the operation name.
    #[inline]
    pub fn with_operation(mut self, name: impl Into<Arc<str>>) -> Self {
        self.operation = Some(name.into());
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches the transient classification of the failure.
    #[inline]
    pub fn with_transient(mut self, transient: bool) -> Self {
        self.transient = Some(transient);
        self
    }

    /// Severity at which loggers should record this event.
    ///
    /// Retries are routine (`DEBUG`); terminal decisions are `INFO`.
    pub fn level(&self) -> Level {
        match self.kind {
            EventKind::Retrying => Level::DEBUG,
            EventKind::GivingUp | EventKind::Canceled => Level::INFO,
        }
    }

    /// Returns `true` for the last event an invocation emits (`GivingUp` or `Canceled`).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self.kind, EventKind::Retrying)
    }
}
