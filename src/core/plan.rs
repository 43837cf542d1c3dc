//! # Retry plan for one invocation.
//!
//! Defines [`RetryPlan`] a bundle that describes how failures of one invocation are
//! handled: continuation predicate, transient classifier, backoff policy and
//! attempt ceiling.
//!
//! A plan can be created:
//! - **For transient-aware failures** with [`RetryPlan::transient`]: retry iff the
//!   failure reports [`Transient::is_transient`];
//! - **With an explicit predicate** with [`RetryPlan::new`]: the caller decides for
//!   ordinary failures, while failures reporting [`Transient::is_transient`] are
//!   still always retried;
//! - **For failure types without classification** with [`RetryPlan::unclassified`]:
//!   only the predicate decides until [`RetryPlan::classify`] installs a classifier.
//!
//! Both take their backoff and `max_attempts` from a [`RetryConfig`]; each knob can
//! then be overridden.
//!
//! ## Give-up rule
//! ```text
//! give_up = (attempt > max_attempts || !should_continue(failure)) && !is_transient(failure)
//! ```
//! A transient failure is therefore retried **indefinitely**, even past `max_attempts`.
//! Bound such loops with a cancellation token.

use std::{fmt, sync::Arc};

use crate::{
    classify::Transient,
    core::config::RetryConfig,
    events::{Event, EventKind},
    policies::Backoff,
};

type Predicate<'a, E> = Box<dyn Fn(&E) -> bool + Send + Sync + 'a>;

/// How failures of one retry invocation are handled.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use retryvisor::{LinearBackoff, RetryConfig, RetryPlan, WorkError};
///
/// let cfg = RetryConfig::default();
/// let plan = RetryPlan::<WorkError>::new(&cfg, |e| !matches!(e, WorkError::Fatal { .. }))
///     .classify(|e| matches!(e, WorkError::Transient { .. }))
///     .backoff(LinearBackoff { increment: Duration::from_millis(100), max_count: 5 })
///     .max_attempts(3)
///     .named("fetch-user");
///
/// assert_eq!(plan.attempt_limit(), 3);
/// ```
pub struct RetryPlan<'a, E> {
    should_continue: Predicate<'a, E>,
    is_transient: Predicate<'a, E>,
    backoff: Box<dyn Backoff<E> + 'a>,
    max_attempts: u32,
    operation: Option<Arc<str>>,
}

impl<'a, E: 'a> RetryPlan<'a, E> {
    /// Creates a plan with an explicit continuation predicate.
    ///
    /// Backoff and `max_attempts` come from `config`. Failures reporting
    /// [`Transient::is_transient`] are retried whatever the predicate answers.
    pub fn new<P>(config: &RetryConfig, should_continue: P) -> Self
    where
        E: Transient,
        P: Fn(&E) -> bool + Send + Sync + 'a,
    {
        Self::unclassified(config, should_continue).classify(E::is_transient)
    }

    /// Creates a plan for a failure type that has no [`Transient`] implementation.
    ///
    /// No failure is transient unless [`RetryPlan::classify`] says so.
    pub fn unclassified<P>(config: &RetryConfig, should_continue: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'a,
    {
        Self {
            should_continue: Box::new(should_continue),
            is_transient: Box::new(|_: &E| false),
            backoff: Box::new(config.default_policy()),
            max_attempts: config.max_attempts,
            operation: None,
        }
    }

    /// Creates a plan that retries iff the failure is transient.
    ///
    /// Backoff and `max_attempts` come from `config`.
    pub fn transient(config: &RetryConfig) -> Self
    where
        E: Transient,
    {
        Self::new(config, E::is_transient)
    }

    /// Replaces the continuation predicate.
    pub fn should_continue<P>(mut self, should_continue: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'a,
    {
        self.should_continue = Box::new(should_continue);
        self
    }

    /// Replaces the transient classifier.
    ///
    /// Failures it accepts are always retried, regardless of predicate and `max_attempts`.
    pub fn classify<K>(mut self, is_transient: K) -> Self
    where
        K: Fn(&E) -> bool + Send + Sync + 'a,
    {
        self.is_transient = Box::new(is_transient);
        self
    }

    /// Replaces the backoff policy.
    ///
    /// Closures must annotate their parameter types: `|attempt: u32, err: &MyError| ...`.
    pub fn backoff<B>(mut self, backoff: B) -> Self
    where
        B: Backoff<E> + 'a,
    {
        self.backoff = Box::new(backoff);
        self
    }

    /// Replaces the attempt ceiling for non-transient failures.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Names the retried operation; the name is attached to every event.
    pub fn named(mut self, operation: impl Into<Arc<str>>) -> Self {
        self.operation = Some(operation.into());
        self
    }

}

impl<E> RetryPlan<'_, E> {
    /// Returns the attempt ceiling for non-transient failures.
    pub fn attempt_limit(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the operation name, if any.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Returns `(give_up, transient)` for a failure of attempt `attempt`.
    pub(crate) fn judge(&self, attempt: u32, failure: &E) -> (bool, bool) {
        if (self.is_transient)(failure) {
            return (false, true);
        }
        let give_up = attempt > self.max_attempts || !(self.should_continue)(failure);
        (give_up, false)
    }

    /// Delay to wait after attempt `attempt` failed with `failure`.
    pub(crate) fn delay(&self, attempt: u32, failure: &E) -> std::time::Duration {
        self.backoff.delay(attempt, failure)
    }

    /// New event of `kind` tagged with this plan's operation name.
    pub(crate) fn event(&self, kind: EventKind) -> Event {
        let event = Event::new(kind);
        match &self.operation {
            Some(name) => event.with_operation(Arc::clone(name)),
            None => event,
        }
    }
}

impl<E> fmt::Debug for RetryPlan<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPlan")
            .field("max_attempts", &self.max_attempts)
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}
