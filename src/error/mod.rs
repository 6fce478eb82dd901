//! Error handling for fusebox
//!
//! This module provides the error types surfaced by the resilience
//! primitives:
//! - Distinguishes fast-fail rejections from failures of the wrapped
//!   operation itself
//! - Carries the caller's own error type through unchanged
//! - Classifies errors as retryable or permanent for the retry executor

use std::time::Duration;
use thiserror::Error;

/// Error returned by [`CircuitBreaker::execute`](crate::CircuitBreaker::execute).
///
/// The two variants are the two failure kinds a caller must be able to
/// distinguish: `Open` means the call was never attempted (admission was
/// denied), `Inner` means the call was attempted and failed with the
/// operation's own error, carried intact.
#[derive(Error, Debug)]
pub enum BreakerError<E> {
    /// The circuit is open and the cool-down has not elapsed; the wrapped
    /// operation was not invoked.
    #[error("circuit open, service temporarily unavailable (retry in {}ms)", retry_after.as_millis())]
    Open {
        /// Time remaining until the breaker will admit a trial call.
        retry_after: Duration,
    },

    /// The wrapped operation was invoked and failed with its own error.
    #[error("{0}")]
    Inner(E),
}

impl<E> BreakerError<E> {
    /// True if this is the fast-fail (admission denied) case.
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open { .. })
    }

    /// Extract the operation's original error, if the call was attempted.
    pub fn into_inner(self) -> Option<E> {
        match self {
            BreakerError::Inner(err) => Some(err),
            BreakerError::Open { .. } => None,
        }
    }
}

/// Classification of errors as transient or permanent.
///
/// The retry executor only re-attempts operations whose errors report
/// themselves as retryable; everything else is returned to the caller on
/// the first failure.
pub trait Retryable {
    /// Check if this error represents a transient condition worth retrying.
    fn is_retryable(&self) -> bool;

    /// Check if this is a permanent error (not retryable).
    fn is_permanent(&self) -> bool {
        !self.is_retryable()
    }
}

/// A fast-fail rejection is transient by definition: the breaker will admit
/// a trial once its cool-down elapses. An attempted-and-failed call defers
/// to the inner error's own classification.
impl<E: Retryable> Retryable for BreakerError<E> {
    fn is_retryable(&self) -> bool {
        match self {
            BreakerError::Open { .. } => true,
            BreakerError::Inner(err) => err.is_retryable(),
        }
    }
}

/// Errors produced while building or loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    /// An environment variable was present but could not be parsed.
    #[error("could not parse environment variable {var} ({value:?})")]
    ParseEnv { var: String, value: String },
}
