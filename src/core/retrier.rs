//! # Retrier: the public retry engine.
//!
//! [`Retrier`] owns an immutable [`RetryConfig`] and a [`SubscriberSet`], and exposes
//! the entry points. All of them delegate to the single loop in [`run`](super::run).
//!
//! ## Entry points
//! | Method               | Work shape        | Plan                   | Cancellation |
//! |----------------------|-------------------|------------------------|--------------|
//! | [`Retrier::execute`] | any [`Work`]      | explicit               | explicit     |
//! | [`Retrier::run_until`] | any [`Work`]    | retry iff transient    | explicit     |
//! | [`Retrier::run`]     | any [`Work`]      | retry iff transient    | none         |
//! | [`Retrier::execute_blocking`] | blocking closure | explicit      | explicit     |
//! | [`Retrier::run_blocking`] | blocking closure | retry iff transient | none         |
//!
//! Unit work is the `T = ()` case of every entry point.
//!
//! ## Transient failures
//! A failure classified as transient is retried even after `max_attempts` is
//! exceeded. Only cancellation ends such a loop; pass a token (for example one
//! cancelled by a deadline) when the work may keep failing transiently.

use std::{fmt::Display, io, sync::Arc};

use tokio::runtime::{self, Handle};
use tokio_util::sync::CancellationToken;

use crate::{
    classify::Transient,
    core::{config::RetryConfig, plan::RetryPlan, run::retry_loop},
    error::{ConfigError, RetryError},
    subscribers::{Subscribe, SubscriberSet},
    work::{BlockingFn, Work},
};

/// Retry engine.
///
/// Cheap to clone; clones share subscribers. Independent invocations may run
/// concurrently: each owns its attempt counter and shares no mutable state.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use retryvisor::{FixedBackoff, Retrier, RetryConfig, WorkError, WorkFn};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let retrier = Retrier::new(RetryConfig::default());
///     let calls = Arc::new(AtomicU32::new(0));
///
///     let work = WorkFn::new(|| {
///         let n = calls.fetch_add(1, Ordering::Relaxed) + 1;
///         async move {
///             if n < 3 {
///                 Err(WorkError::transient(format!("blip #{n}")))
///             } else {
///                 Ok(n)
///             }
///         }
///     });
///
///     let plan = retrier.plan().backoff(FixedBackoff { delay: Duration::from_millis(1) });
///     let value = retrier
///         .execute(work, plan, &tokio_util::sync::CancellationToken::new())
///         .await
///         .unwrap();
///     assert_eq!(value, 3);
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Retrier {
    config: RetryConfig,
    subscribers: SubscriberSet,
}

impl Retrier {
    /// Creates an engine without subscribers.
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            subscribers: SubscriberSet::default(),
        }
    }

    /// Creates an engine after validating `config`.
    pub fn try_new(config: RetryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Adds a subscriber receiving retry events.
    #[must_use]
    pub fn with_subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Adds several subscribers.
    #[must_use]
    pub fn with_subscribers(mut self, subs: impl IntoIterator<Item = Arc<dyn Subscribe>>) -> Self {
        for sub in subs {
            self.subscribers.push(sub);
        }
        self
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Plan that retries iff the failure is transient, with this engine's defaults.
    pub fn plan<'a, E: Transient + 'a>(&self) -> RetryPlan<'a, E> {
        RetryPlan::transient(&self.config)
    }

    /// Plan with an explicit continuation predicate, with this engine's defaults.
    ///
    /// Transient failures are retried even when the predicate rejects them.
    pub fn plan_if<'a, E: Transient + 'a, P>(&self, should_continue: P) -> RetryPlan<'a, E>
    where
        P: Fn(&E) -> bool + Send + Sync + 'a,
    {
        RetryPlan::new(&self.config, should_continue)
    }

    /// Plan for a failure type without [`Transient`] classification.
    ///
    /// See [`RetryPlan::unclassified`].
    pub fn plan_unclassified<'a, E: 'a, P>(&self, should_continue: P) -> RetryPlan<'a, E>
    where
        P: Fn(&E) -> bool + Send + Sync + 'a,
    {
        RetryPlan::unclassified(&self.config, should_continue)
    }

    /// Runs `work` under `plan` until it succeeds, the plan gives up, or `cancel` fires.
    ///
    /// # Errors
    /// - [`RetryError::Canceled`] if `cancel` fired before an attempt, while one was
    ///   running, or during a backoff wait;
    /// - [`RetryError::Failed`] with the last attempt's failure when the plan gives up.
    pub async fn execute<W, T, E>(
        &self,
        work: W,
        plan: RetryPlan<'_, E>,
        cancel: &CancellationToken,
    ) -> Result<T, RetryError<E>>
    where
        W: Work<T, E>,
        E: Display,
    {
        retry_loop(work, &plan, cancel, &self.subscribers).await
    }

    /// Runs `work`, retrying transient failures with the configured defaults, until `cancel` fires.
    pub async fn run_until<W, T, E>(&self, work: W, cancel: &CancellationToken) -> Result<T, RetryError<E>>
    where
        W: Work<T, E>,
        E: Transient + Display,
    {
        self.execute(work, self.plan(), cancel).await
    }

    /// Runs `work`, retrying transient failures with the configured defaults.
    ///
    /// Never cancelled: a failure that stays transient is retried forever.
    pub async fn run<W, T, E>(&self, work: W) -> Result<T, RetryError<E>>
    where
        W: Work<T, E>,
        E: Transient + Display,
    {
        self.run_until(work, &CancellationToken::new()).await
    }

    /// Blocking form of [`Retrier::execute`] for a blocking closure.
    ///
    /// Drives the same loop on a private current-thread runtime; backoff waits block the
    /// calling thread and stay interruptible by `cancel` (which may be fired from another thread).
    ///
    /// # Errors
    /// As [`Retrier::execute`], plus [`RetryError::Runtime`] if called from within an
    /// async runtime (use [`Retrier::execute`] with a [`BlockingFn`] there instead) or
    /// if the private runtime cannot be built. In both cases `f` is never called.
    pub fn execute_blocking<F, T, E>(
        &self,
        f: F,
        plan: RetryPlan<'_, E>,
        cancel: &CancellationToken,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E> + Send,
        T: Send,
        E: Send + Display,
    {
        if Handle::try_current().is_ok() {
            return Err(RetryError::Runtime(io::Error::other(
                "blocking retry called from within an async runtime",
            )));
        }
        let rt = runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(RetryError::Runtime)?;
        rt.block_on(self.execute(BlockingFn::new(f), plan, cancel))
    }

    /// Blocking form of [`Retrier::run`].
    ///
    /// # Errors
    /// As [`Retrier::execute_blocking`].
    pub fn run_blocking<F, T, E>(&self, f: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E> + Send,
        T: Send,
        E: Transient + Send + Display,
    {
        self.execute_blocking(f, self.plan(), &CancellationToken::new())
    }
}
