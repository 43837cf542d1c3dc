//! # The retry loop.
//!
//! One generic loop drives every entry point of [`Retrier`](crate::Retrier):
//! async or blocking work, with or without a value.
//!
//! ## Flow
//! ```text
//! k = 1
//! loop {
//!   ├─► cancelled?                     ─► Canceled{attempts: k-1}
//!   ├─► work.attempt().await
//!   │       ├─ Ok(v)                   ─► return v
//!   │       └─ Err(f)
//!   ├─► cancelled while running?       ─► Canceled{attempts: k}
//!   ├─► judge(k, f)
//!   │       ├─ give up                 ─► publish GivingUp, return Failed{k, f}
//!   │       └─ retry
//!   ├─► delay = backoff.delay(k, f); publish Retrying
//!   ├─► delay > 0: sleep(delay) | cancelled()  ─► Canceled{attempts: k}
//!   └─► k += 1
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; attempt `k+1` starts only after attempt `k`
//!   is judged and its delay has elapsed.
//! - The attempt counter is owned by the invocation and never resets.
//! - Cancellation is checked before every attempt, right after a failed attempt and
//!   during every wait. In-flight work is never aborted.
//! - The failure in `Failed` is the one returned by the last attempt, untouched.

use std::fmt::Display;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    core::plan::RetryPlan, error::RetryError, events::EventKind, subscribers::SubscriberSet,
    work::Work,
};

/// Runs `work` under `plan` until success, give-up or cancellation.
pub(crate) async fn retry_loop<W, T, E>(
    mut work: W,
    plan: &RetryPlan<'_, E>,
    cancel: &CancellationToken,
    subscribers: &SubscriberSet,
) -> Result<T, RetryError<E>>
where
    W: Work<T, E>,
    E: Display,
{
    let mut attempt: u32 = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(canceled(plan, subscribers, attempt - 1));
        }

        let failure = match work.attempt().await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        if cancel.is_cancelled() {
            return Err(canceled(plan, subscribers, attempt));
        }

        let (give_up, transient) = plan.judge(attempt, &failure);
        if give_up {
            subscribers.emit(|| {
                plan.event(EventKind::GivingUp)
                    .with_attempt(attempt)
                    .with_transient(transient)
                    .with_reason(failure.to_string())
            });
            return Err(RetryError::Failed {
                attempts: attempt,
                error: failure,
            });
        }

        let delay = plan.delay(attempt, &failure);
        subscribers.emit(|| {
            plan.event(EventKind::Retrying)
                .with_attempt(attempt)
                .with_delay(delay)
                .with_transient(transient)
                .with_reason(failure.to_string())
        });

        if !delay.is_zero() {
            select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(canceled(plan, subscribers, attempt));
                }
                _ = time::sleep(delay) => {}
            }
        }

        attempt = attempt.saturating_add(1);
    }
}

/// Publishes `Canceled` and builds the matching error.
fn canceled<E>(plan: &RetryPlan<'_, E>, subscribers: &SubscriberSet, attempts: u32) -> RetryError<E> {
    subscribers.emit(|| plan.event(EventKind::Canceled).with_attempt(attempts));
    RetryError::Canceled { attempts }
}
