//! Engine core: configuration, plans and the retry loop.
//!
//! The public API from this module is [`Retrier`], [`RetryPlan`] and [`RetryConfig`].
//!
//! Internal modules:
//! - [`config`]: immutable engine configuration, TOML loading and validation;
//! - [`plan`]: per-invocation predicate, classifier, backoff and attempt ceiling;
//! - [`run`]: the single retry loop shared by every entry point;
//! - [`retrier`]: entry points (async/blocking, explicit/default plan and cancellation).

pub(crate) mod config;
mod plan;
mod retrier;
mod run;

#[cfg(test)]
mod tests;

pub use config::RetryConfig;
pub use plan::RetryPlan;
pub use retrier::Retrier;
