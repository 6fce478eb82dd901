//! # fusebox
//!
//! Resilience primitives for protecting calls to unreliable external
//! services.
//!
//! This crate provides:
//!
//! - `CircuitBreaker`: admission control for a failing dependency, with
//!   automatic recovery probing through a half-open trial call
//! - `RetryExecutor`: caller-side retry with exponential backoff
//! - `BreakerRegistry`: one shared breaker per protected dependency,
//!   owned by the application's composition root
//! - A small error taxonomy that keeps the fast-fail rejection
//!   distinguishable from the wrapped operation's own error
//!
//! ## Architecture
//!
//! The breaker and the retry executor are deliberately separate. The
//! breaker decides whether an attempt should be made at all; it never
//! retries, never times an operation out, and never transforms the
//! operation's error. Retry policy is composed around the breaker by the
//! caller, so every attempt passes through admission control:
//!
//! ```no_run
//! use fusebox::{BreakerRegistry, RetryConfig, RetryExecutor};
//!
//! # #[derive(Debug)] struct ApiError;
//! # impl std::fmt::Display for ApiError {
//! #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "api") }
//! # }
//! # impl fusebox::Retryable for ApiError {
//! #     fn is_retryable(&self) -> bool { true }
//! # }
//! # async fn fetch_feed() -> Result<Vec<String>, ApiError> { Ok(vec![]) }
//! # async fn demo() {
//! let registry = BreakerRegistry::default();
//! let breaker = registry.get_or_create("feed");
//! let retry = RetryExecutor::new(RetryConfig::default());
//!
//! let posts = retry
//!     .execute(|| breaker.execute(|| fetch_feed()))
//!     .await;
//! # let _ = posts;
//! # }
//! ```

// Re-export configuration
pub mod config;
pub use config::CircuitBreakerConfig;

// Re-export error handling
pub mod error;
pub use error::{BreakerError, ConfigError, Retryable};

// Re-export resilience primitives
pub mod resilience;
pub use resilience::{BreakerMetrics, CircuitBreaker, CircuitState, RetryConfig, RetryExecutor};

// Re-export the per-dependency registry
pub mod registry;
pub use registry::BreakerRegistry;

#[cfg(test)]
mod tests;
