//! Circuit Breaker Demo
//!
//! This example demonstrates the circuit breaker lifecycle against a mock
//! service that fails intermittently: tripping after consecutive failures,
//! fast-failing while open, and recovering through a half-open trial call.
//! It also shows the intended composition with the retry executor.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fusebox::{
    BreakerRegistry, CircuitBreakerConfig, RetryConfig, RetryExecutor, Retryable,
};

#[derive(Debug)]
struct FeedError(&'static str);

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feed service error: {}", self.0)
    }
}

impl Retryable for FeedError {
    fn is_retryable(&self) -> bool {
        true
    }
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    println!("Circuit Breaker Demo");
    println!("====================\n");

    let registry = BreakerRegistry::new(CircuitBreakerConfig {
        failure_threshold: 3,
        reset_timeout: Duration::from_secs(1),
        monitoring_period: Duration::from_secs(10),
    });
    let breaker = registry.get_or_create("feed-service");

    // A mock service that fails its first five calls, then recovers.
    let calls = Arc::new(AtomicUsize::new(0));
    let flaky = |calls: Arc<AtomicUsize>| async move {
        if calls.fetch_add(1, Ordering::SeqCst) < 5 {
            Err(FeedError("503 service unavailable"))
        } else {
            Ok("20 fresh posts")
        }
    };

    println!("PHASE 1: consecutive failures trip the breaker");
    println!("----------------------------------------------");
    for attempt in 1..=4 {
        let result = breaker.execute(|| flaky(Arc::clone(&calls))).await;
        match result {
            Ok(posts) => println!("attempt {attempt}: ok ({posts})"),
            Err(err) if err.is_open() => println!("attempt {attempt}: refused, {err}"),
            Err(err) => println!("attempt {attempt}: failed, {err}"),
        }
        println!(
            "  state={} consecutive_failures={} failure_rate={:.2}",
            breaker.state(),
            breaker.consecutive_failures(),
            breaker.failure_rate()
        );
    }

    println!("\nPHASE 2: cool-down, then a trial call probes for recovery");
    println!("---------------------------------------------------------");
    tokio::time::sleep(Duration::from_millis(1100)).await;

    // The mock still fails once more, so the trial re-opens the circuit.
    for attempt in 5..=6 {
        let result = breaker.execute(|| flaky(Arc::clone(&calls))).await;
        match result {
            Ok(posts) => println!("attempt {attempt}: ok ({posts})"),
            Err(err) => println!("attempt {attempt}: {err}"),
        }
        println!("  state={}", breaker.state());
    }

    println!("\nPHASE 3: retry composed around the breaker");
    println!("------------------------------------------");
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let retry = RetryExecutor::new(RetryConfig {
        max_retries: 3,
        initial_interval: Duration::from_millis(200),
        max_interval: Duration::from_secs(1),
        ..RetryConfig::default()
    });

    let result = retry
        .execute(|| breaker.execute(|| flaky(Arc::clone(&calls))))
        .await;
    match result {
        Ok(posts) => println!("recovered: {posts}"),
        Err(err) => println!("still failing: {err}"),
    }

    let metrics = breaker.metrics();
    println!(
        "\nfinal snapshot: state={} tracked_requests={} failure_rate={:.2}",
        metrics.state, metrics.tracked_requests, metrics.failure_rate
    );
}
