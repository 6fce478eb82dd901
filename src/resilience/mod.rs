//! Resilience patterns for callers of unreliable services
//!
//! This module provides the two primitives of the crate:
//! - Circuit breaker (admission control with automatic recovery probing)
//! - Retry with exponential backoff
//!
//! The two are deliberately independent. The breaker decides whether an
//! attempt should be made at all; retry policy belongs to the caller and is
//! composed around the breaker, so that every retry attempt passes through
//! admission control and the breaker's request accounting stays accurate.

mod circuit_breaker;
mod history;
mod retry;

pub use circuit_breaker::{BreakerMetrics, CircuitBreaker};
pub use retry::{RetryConfig, RetryExecutor};

/// State of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Circuit is closed, operations pass through normally
    Closed,

    /// Circuit is open, operations fail fast without being attempted
    Open,

    /// Circuit is half-open, exactly one trial operation is allowed through
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Open => write!(f, "Open"),
            Self::HalfOpen => write!(f, "HalfOpen"),
        }
    }
}
