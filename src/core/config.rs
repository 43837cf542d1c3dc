//! # Retry configuration.
//!
//! Provides [`RetryConfig`] centralized, immutable settings for a [`Retrier`](crate::Retrier).
//!
//! Config is used in two ways:
//! 1. **Retrier creation**: `Retrier::new(config)`
//! 2. **Plan defaults**: `RetryPlan::transient(&config)` / `RetryPlan::new(&config, predicate)` / `RetryPlan::unclassified(&config, predicate)`
//!
//! A config is a plain value: it is read when a plan is built and never mutated
//! behind the caller's back, so concurrent callers cannot affect each other.
//!
//! ## File format
//! Durations are written in milliseconds; every field is optional.
//! ```toml
//! max_attempts = 5
//! default_backoff = "linear"    # "fixed" (alias "none") | "linear" | "exponential"
//!
//! [fixed]
//! delay_ms = 1000
//!
//! [linear]
//! increment_ms = 1000
//! max_count = 10
//!
//! [exponential]
//! base_ms = 1000
//! max_count = 6
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    error::ConfigError,
    policies::{
        BackoffKind, BackoffPolicy, ExponentialBackoff, FixedBackoff, LinearBackoff, MAX_EXPONENT,
    },
};

/// Configuration for the retry engine.
///
/// ## Field semantics
/// - `max_attempts`: retries allowed for non-transient failures; the engine gives up once
///   the attempt number exceeds it (so at most `max_attempts + 1` executions)
/// - `default_backoff`: policy used by plans that do not set one explicitly
/// - `fixed`, `linear`, `exponential`: per-policy constants
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Attempt ceiling for non-transient failures (`>= 1`).
    pub max_attempts: u32,

    /// Backoff used when a plan does not choose one.
    pub default_backoff: BackoffKind,

    /// Constants for [`BackoffPolicy::Fixed`].
    pub fixed: FixedBackoff,

    /// Constants for [`BackoffPolicy::Linear`].
    pub linear: LinearBackoff,

    /// Constants for [`BackoffPolicy::Exponential`].
    pub exponential: ExponentialBackoff,
}

impl Default for RetryConfig {
    /// Default configuration:
    ///
    /// - `max_attempts = 5`
    /// - `default_backoff = exponential`
    /// - `fixed.delay = 1s`
    /// - `linear.increment = 1s`, `linear.max_count = 10`
    /// - `exponential.base = 1s`, `exponential.max_count = 6`
    fn default() -> Self {
        Self {
            max_attempts: 5,
            default_backoff: BackoffKind::default(),
            fixed: FixedBackoff::default(),
            linear: LinearBackoff::default(),
            exponential: ExponentialBackoff::default(),
        }
    }
}

impl RetryConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: RetryConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// Zero delays are allowed (they mean "retry immediately"); zero counts are not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        if self.linear.max_count == 0 {
            return Err(invalid("linear.max_count", "must be at least 1"));
        }
        if self.exponential.max_count == 0 {
            return Err(invalid("exponential.max_count", "must be at least 1"));
        }
        if self.exponential.max_count > MAX_EXPONENT {
            return Err(invalid("exponential.max_count", "must be at most 62"));
        }
        if self.exponential.base.is_zero() {
            return Err(invalid("exponential.base_ms", "must be positive"));
        }
        Ok(())
    }

    /// Builds the policy of the given kind from this config's constants.
    pub fn backoff(&self, kind: BackoffKind) -> BackoffPolicy {
        match kind {
            BackoffKind::Fixed => BackoffPolicy::Fixed(self.fixed),
            BackoffKind::Linear => BackoffPolicy::Linear(self.linear),
            BackoffKind::Exponential => BackoffPolicy::Exponential(self.exponential),
        }
    }

    /// Builds the policy named by [`RetryConfig::default_backoff`].
    #[inline]
    pub fn default_policy(&self) -> BackoffPolicy {
        self.backoff(self.default_backoff)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Serde adapter: `Duration` written as integer milliseconds.
pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
