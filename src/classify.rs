//! # Transient-failure classification.
//!
//! [`Transient`] marks failure types that know whether they are worth retrying.
//! The engine retries a failure classified as transient **regardless** of the
//! continuation predicate and of `max_attempts`; see [`Retrier`](crate::Retrier).
//!
//! Built-in implementations:
//! - [`WorkError`]: only the `Transient` variant;
//! - [`std::io::Error`]: timeouts, interruptions and dropped connections;
//! - [`tokio::time::error::Elapsed`]: always.

use std::io;

use tokio::time::error::Elapsed;

use crate::error::WorkError;

/// Classification capability: "this failure kind is inherently transient".
pub trait Transient {
    /// Returns `true` if retrying is expected to eventually succeed.
    fn is_transient(&self) -> bool;
}

impl Transient for WorkError {
    fn is_transient(&self) -> bool {
        matches!(self, WorkError::Transient { .. })
    }
}

impl Transient for io::Error {
    fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            io::ErrorKind::TimedOut
                | io::ErrorKind::Interrupted
                | io::ErrorKind::WouldBlock
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::BrokenPipe
        )
    }
}

impl Transient for Elapsed {
    fn is_transient(&self) -> bool {
        true
    }
}

impl<T: Transient + ?Sized> Transient for Box<T> {
    fn is_transient(&self) -> bool {
        (**self).is_transient()
    }
}
