//! Registry tests: shared health signal across call sites

use std::time::Duration;

use crate::{BreakerRegistry, CircuitBreakerConfig, CircuitState};

#[derive(Debug)]
struct UpstreamError;

fn quick_config() -> CircuitBreakerConfig {
    CircuitBreakerConfig {
        failure_threshold: 2,
        reset_timeout: Duration::from_secs(60),
        monitoring_period: Duration::from_secs(120),
    }
}

#[tokio::test]
async fn failures_seen_by_one_caller_gate_the_others() {
    let registry = BreakerRegistry::new(quick_config());

    // Two call sites, one dependency.
    let site_a = registry.get_or_create("data-service");
    let site_b = registry.get_or_create("data-service");

    for _ in 0..2 {
        site_a
            .execute(|| async { Err::<(), _>(UpstreamError) })
            .await
            .unwrap_err();
    }

    // The other call site is refused without attempting anything.
    let err = site_b
        .execute(|| async { Ok::<(), UpstreamError>(()) })
        .await
        .unwrap_err();
    assert!(err.is_open());
    assert_eq!(site_b.state(), CircuitState::Open);
}

#[tokio::test]
async fn breakers_for_different_dependencies_fail_independently() {
    let registry = BreakerRegistry::new(quick_config());
    let feed = registry.get_or_create("feed");
    let uploads = registry.get_or_create("uploads");

    for _ in 0..2 {
        feed.execute(|| async { Err::<(), _>(UpstreamError) })
            .await
            .unwrap_err();
    }

    assert_eq!(feed.state(), CircuitState::Open);
    assert_eq!(uploads.state(), CircuitState::Closed);

    let result = uploads.execute(|| async { Ok::<_, UpstreamError>("ok") }).await;
    assert_eq!(result.unwrap(), "ok");
}

#[tokio::test]
async fn reset_all_recovers_every_breaker() {
    let registry = BreakerRegistry::new(quick_config());
    for name in ["feed", "engagement"] {
        let breaker = registry.get_or_create(name);
        for _ in 0..2 {
            breaker
                .execute(|| async { Err::<(), _>(UpstreamError) })
                .await
                .unwrap_err();
        }
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    registry.reset_all();

    for name in ["feed", "engagement"] {
        let breaker = registry.get(name).unwrap();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.consecutive_failures(), 0);
    }
}
