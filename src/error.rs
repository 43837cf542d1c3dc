//! Error types used by the retry engine and by retried work.
//!
//! This module defines three enums:
//!
//! - [`RetryError`]: the outcome of a retry invocation that did not succeed.
//! - [`WorkError`]: a ready-made tagged failure for work that has no error type of its own.
//! - [`ConfigError`]: failures loading or validating a [`RetryConfig`](crate::RetryConfig).
//!
//! All of them provide `as_label` for logs/metrics.

use std::io;

use thiserror::Error;

/// # Outcome of a retry invocation that did not produce a value.
///
/// The final failure of the work is carried **unmodified** in [`RetryError::Failed`];
/// cancellation is reported as its own kind and takes precedence over any failure.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The cancellation token fired before an attempt or during a backoff wait.
    #[error("retry canceled after {attempts} attempt(s)")]
    Canceled {
        /// Number of attempts that were executed before cancellation was observed.
        attempts: u32,
    },

    /// The engine gave up; `error` is the failure of the last attempt.
    #[error("gave up after {attempts} attempt(s): {error}")]
    Failed {
        /// Number of attempts executed, including the last one.
        attempts: u32,
        /// The original failure returned by the work.
        #[source]
        error: E,
    },

    /// A blocking entry point could not drive its private runtime: it was called from
    /// inside an async runtime, or the runtime could not be built.
    #[error("blocking retry runtime unavailable: {0}")]
    Runtime(#[source] io::Error),
}

impl<E> RetryError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::RetryError;
    ///
    /// let err: RetryError<std::io::Error> = RetryError::Canceled { attempts: 2 };
    /// assert_eq!(err.as_label(), "retry_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Canceled { .. } => "retry_canceled",
            RetryError::Failed { .. } => "retry_failed",
            RetryError::Runtime(_) => "retry_runtime",
        }
    }

    /// Number of attempts executed (zero for runtime failures).
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Canceled { attempts } | RetryError::Failed { attempts, .. } => *attempts,
            RetryError::Runtime(_) => 0,
        }
    }

    /// Returns `true` if the invocation ended because of cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RetryError::Canceled { .. })
    }

    /// Returns the failure of the last attempt, if the engine gave up.
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// # Tagged failure for retried work.
///
/// Lets work classify its own failures without defining an error type:
/// [`WorkError::Transient`] is always retried, [`WorkError::Fail`] is left to the
/// continuation predicate, and [`WorkError::Fatal`] is rejected by the default predicate.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    /// Inherently transient failure (network blip, throttling); always retried.
    #[error("transient failure: {reason}")]
    Transient {
        /// Human-readable reason.
        reason: String,
    },

    /// Ordinary failure; retried only if the continuation predicate approves.
    #[error("execution failed: {reason}")]
    Fail {
        /// Human-readable reason.
        reason: String,
    },

    /// Non-recoverable failure.
    #[error("fatal error: {reason}")]
    Fatal {
        /// Human-readable reason.
        reason: String,
    },
}

impl WorkError {
    /// Shorthand for [`WorkError::Transient`].
    pub fn transient(reason: impl Into<String>) -> Self {
        WorkError::Transient {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`WorkError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        WorkError::Fail {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`WorkError::Fatal`].
    pub fn fatal(reason: impl Into<String>) -> Self {
        WorkError::Fatal {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::WorkError;
    ///
    /// assert_eq!(WorkError::fatal("nope").as_label(), "work_fatal");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkError::Transient { .. } => "work_transient",
            WorkError::Fail { .. } => "work_failed",
            WorkError::Fatal { .. } => "work_fatal",
        }
    }
}

/// # Errors loading or validating a [`RetryConfig`](crate::RetryConfig).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The config text is not valid TOML for [`RetryConfig`](crate::RetryConfig).
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {field} {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "config_read",
            ConfigError::Parse(_) => "config_parse",
            ConfigError::Invalid { .. } => "config_invalid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_keeps_original_error() {
        let err = RetryError::Failed {
            attempts: 3,
            error: WorkError::fail("boom"),
        };
        assert_eq!(err.attempts(), 3);
        assert!(!err.is_canceled());
        assert_eq!(err.to_string(), "gave up after 3 attempt(s): execution failed: boom");
        assert_eq!(err.into_inner(), Some(WorkError::fail("boom")));
    }

    #[test]
    fn canceled_has_no_inner_error() {
        let err: RetryError<WorkError> = RetryError::Canceled { attempts: 0 };
        assert!(err.is_canceled());
        assert_eq!(err.as_label(), "retry_canceled");
        assert_eq!(err.into_inner(), None);
    }

    #[test]
    fn work_error_labels() {
        assert_eq!(WorkError::transient("x").as_label(), "work_transient");
        assert_eq!(WorkError::fail("x").as_label(), "work_failed");
        assert_eq!(WorkError::fatal("x").as_label(), "work_fatal");
    }
}
