//! Configuration for the resilience primitives
//!
//! Configuration is supplied at construction as a plain struct; an optional
//! environment loader allows deployments to tune breakers per dependency
//! without code changes.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Circuit breaker configuration, immutable per breaker instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive failures before the circuit opens
    pub failure_threshold: u32,

    /// Cool-down after tripping before a trial call is admitted
    pub reset_timeout: Duration,

    /// Trailing window over which the rolling failure rate is computed
    pub monitoring_period: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
            monitoring_period: Duration::from_secs(60),
        }
    }
}

impl CircuitBreakerConfig {
    /// Check that all fields hold usable values.
    ///
    /// A `monitoring_period` shorter than `reset_timeout` is legal but makes
    /// the rolling rate a poor recovery signal, so it is logged rather than
    /// rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "failure_threshold",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.reset_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "reset_timeout",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.monitoring_period.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "monitoring_period",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.monitoring_period < self.reset_timeout {
            log::warn!(
                "monitoring_period ({:?}) is shorter than reset_timeout ({:?}); \
                 the rolling failure rate will cover less than one cool-down",
                self.monitoring_period,
                self.reset_timeout
            );
        }
        Ok(())
    }

    /// Load configuration from environment variables, falling back to the
    /// defaults for any variable that is unset.
    ///
    /// With prefix `FEED`, the variables read are `FEED_FAILURE_THRESHOLD`,
    /// `FEED_RESET_TIMEOUT_MS` and `FEED_MONITORING_PERIOD_MS`.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let failure_threshold = read_env_u64(prefix, "FAILURE_THRESHOLD")?
            .map(|v| v as u32)
            .unwrap_or(defaults.failure_threshold);
        let reset_timeout = read_env_u64(prefix, "RESET_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.reset_timeout);
        let monitoring_period = read_env_u64(prefix, "MONITORING_PERIOD_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.monitoring_period);

        let config = Self {
            failure_threshold,
            reset_timeout,
            monitoring_period,
        };
        config.validate()?;
        Ok(config)
    }
}

fn read_env_u64(prefix: &str, key: &str) -> Result<Option<u64>, ConfigError> {
    let var = format!("{}_{}", prefix, key);
    match env::var(&var) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::ParseEnv { var, value }),
        Err(_) => Ok(None),
    }
}
