//! Per-dependency breaker instances
//!
//! A breaker is only useful when every call site of a dependency shares the
//! same instance, so a failure seen by one caller affects admission for all
//! of them. The registry gives a composition root one place to own those
//! shared instances and hand them out by name; tests construct their own
//! registry instead of touching global state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::config::CircuitBreakerConfig;
use crate::resilience::CircuitBreaker;

/// Owns one [`CircuitBreaker`] per named dependency.
pub struct BreakerRegistry {
    default_config: CircuitBreakerConfig,
    breakers: RwLock<HashMap<String, Arc<CircuitBreaker>>>,
}

impl BreakerRegistry {
    /// Create a registry whose breakers use `default_config` unless a
    /// per-dependency config is supplied.
    pub fn new(default_config: CircuitBreakerConfig) -> Self {
        Self {
            default_config,
            breakers: RwLock::new(HashMap::new()),
        }
    }

    /// Get the breaker for `name`, creating it with the registry's default
    /// configuration on first use.
    pub fn get_or_create(&self, name: &str) -> Arc<CircuitBreaker> {
        self.get_or_create_with(name, || self.default_config.clone())
    }

    /// Get the breaker for `name`, creating it with `config()` on first
    /// use. The configuration is ignored if the breaker already exists.
    pub fn get_or_create_with<F>(&self, name: &str, config: F) -> Arc<CircuitBreaker>
    where
        F: FnOnce() -> CircuitBreakerConfig,
    {
        if let Some(breaker) = self.breakers.read().unwrap().get(name) {
            return Arc::clone(breaker);
        }

        let mut breakers = self.breakers.write().unwrap();
        // Racing creators settle on whichever entry landed first.
        Arc::clone(
            breakers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(CircuitBreaker::new(config()))),
        )
    }

    /// Get the breaker for `name` if it has been created.
    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.read().unwrap().get(name).map(Arc::clone)
    }

    /// Names of all registered breakers.
    pub fn names(&self) -> Vec<String> {
        self.breakers.read().unwrap().keys().cloned().collect()
    }

    /// Force every registered breaker back to closed.
    pub fn reset_all(&self) {
        for breaker in self.breakers.read().unwrap().values() {
            breaker.reset();
        }
    }
}

impl Default for BreakerRegistry {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_returns_same_instance() {
        let registry = BreakerRegistry::default();
        let a = registry.get_or_create("feed");
        let b = registry.get_or_create("feed");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinct_names_get_distinct_breakers() {
        let registry = BreakerRegistry::default();
        let feed = registry.get_or_create("feed");
        let engagement = registry.get_or_create("engagement");
        assert!(!Arc::ptr_eq(&feed, &engagement));
        assert_eq!(registry.names().len(), 2);
    }

    #[test]
    fn per_dependency_config_applies_on_first_use() {
        let registry = BreakerRegistry::default();
        let breaker = registry.get_or_create_with("engagement", || CircuitBreakerConfig {
            failure_threshold: 2,
            ..CircuitBreakerConfig::default()
        });
        assert_eq!(breaker.config().failure_threshold, 2);

        // Existing entry wins over a later config.
        let again = registry.get_or_create_with("engagement", || CircuitBreakerConfig {
            failure_threshold: 9,
            ..CircuitBreakerConfig::default()
        });
        assert_eq!(again.config().failure_threshold, 2);
    }

    #[test]
    fn get_only_sees_created_breakers() {
        let registry = BreakerRegistry::default();
        assert!(registry.get("feed").is_none());
        registry.get_or_create("feed");
        assert!(registry.get("feed").is_some());
    }
}
