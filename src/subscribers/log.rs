//! # LogWriter: tracing-backed event logger
//!
//! A subscriber that forwards every [`Event`] to [`tracing`] with structured fields,
//! at the severity reported by [`Event::level`]: retries at `DEBUG`, give-ups and
//! cancellations at `INFO`. Fields that the event does not carry are omitted.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! DEBUG retryvisor: retrying seq=3 operation="fetch" attempt=1 delay_ms=500 transient=false reason="connection refused"
//! DEBUG retryvisor: retrying seq=4 operation="fetch" attempt=2 delay_ms=1500 transient=false reason="connection refused"
//!  INFO retryvisor: giving up seq=9 operation="fetch" attempt=6 transient=false reason="connection refused"
//!  INFO retryvisor: retry canceled seq=12 operation="fetch" attempt=2
//! ```

use tracing::Level;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// `tracing` needs a constant level per callsite, so each level gets its own.
macro_rules! log_event {
    ($level:expr, $e:expr, $message:expr) => {
        tracing::event!(
            target: "retryvisor",
            $level,
            seq = $e.seq,
            operation = $e.operation.as_deref(),
            attempt = $e.attempt,
            delay_ms = $e.delay_ms,
            transient = $e.transient,
            reason = $e.reason.as_deref(),
            "{}",
            $message
        )
    };
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let message = match e.kind {
            EventKind::Retrying => "retrying",
            EventKind::GivingUp => "giving up",
            EventKind::Canceled => "retry canceled",
        };
        let level = e.level();
        if level == Level::TRACE {
            log_event!(Level::TRACE, e, message);
        } else if level == Level::DEBUG {
            log_event!(Level::DEBUG, e, message);
        } else if level == Level::INFO {
            log_event!(Level::INFO, e, message);
        } else if level == Level::WARN {
            log_event!(Level::WARN, e, message);
        } else {
            log_event!(Level::ERROR, e, message);
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
