//! Circuit breaker implementation for preventing cascading failures
//!
//! This module implements the circuit breaker pattern to stop callers from
//! repeatedly invoking a dependency that is currently failing, while probing
//! automatically for recovery.

use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::CircuitBreakerConfig;
use crate::error::BreakerError;

use super::history::{Outcome, RequestHistory};
use super::CircuitState;

/// A thread-safe circuit breaker.
///
/// One instance protects one external dependency and is shared (via `Arc`)
/// by every call site that should contribute to the same health signal.
/// The breaker performs admission control only: it never retries, imposes
/// no timeout on the wrapped operation, and propagates the operation's own
/// error unchanged.
///
/// The `Open` → `HalfOpen` transition is lazy: it happens on the first
/// [`execute`](Self::execute) observed after the cool-down, not on a timer.
/// While `HalfOpen`, exactly one trial call is admitted; concurrent callers
/// are fast-failed until the trial resolves.
///
/// The rolling failure rate reported by [`failure_rate`](Self::failure_rate)
/// and the consecutive-failure counter that trips the breaker are
/// independent signals and are never reconciled: a breaker can be `Open`
/// from a burst of consecutive failures while the rate over the monitoring
/// window is still low. Callers inspecting both should not expect them to
/// agree.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    next_attempt_at: Option<Instant>,
    trial_in_flight: bool,
    history: RequestHistory,
}

/// How a call was admitted. Trial admissions release the half-open slot
/// when they resolve.
#[derive(Clone, Copy)]
enum Admission {
    Normal,
    Trial,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the specified configuration.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let history = RequestHistory::new(config.monitoring_period);
        Self {
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                next_attempt_at: None,
                trial_in_flight: false,
                history,
            }),
        }
    }

    /// Run `operation` under admission control.
    ///
    /// While the circuit is open and inside its cool-down the operation is
    /// never invoked and the call fails fast with
    /// [`BreakerError::Open`]. Otherwise the operation is invoked exactly
    /// once and its outcome recorded; a failure is handed back intact as
    /// [`BreakerError::Inner`].
    ///
    /// The internal lock is released while the operation is awaited, so
    /// concurrent calls on the same breaker interleave freely; only the
    /// admission decision and the outcome recording are serialized.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let admission = self
            .admit(Instant::now())
            .map_err(|retry_after| BreakerError::Open { retry_after })?;

        match operation().await {
            Ok(value) => {
                self.on_success(Instant::now(), admission);
                Ok(value)
            }
            Err(err) => {
                self.on_failure(Instant::now(), admission);
                Err(BreakerError::Inner(err))
            }
        }
    }

    /// Get the current circuit state.
    ///
    /// An `Open` breaker whose cool-down has elapsed still reports `Open`
    /// here; the transition to `HalfOpen` only happens on the next
    /// [`execute`](Self::execute).
    pub fn state(&self) -> CircuitState {
        self.inner.lock().unwrap().state
    }

    /// Get the current number of consecutive failures.
    pub fn consecutive_failures(&self) -> u32 {
        self.inner.lock().unwrap().consecutive_failures
    }

    /// Rolling failure rate over the monitoring window, 0.0 when no
    /// requests are recorded. Prunes stale entries as a side effect so the
    /// window stays bounded even on an idle breaker.
    pub fn failure_rate(&self) -> f64 {
        self.inner.lock().unwrap().history.failure_rate(Instant::now())
    }

    /// Unconditionally force the breaker back to `Closed`, zeroing the
    /// failure counter and clearing the request history. Intended for
    /// administrative recovery and test isolation.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.next_attempt_at = None;
        inner.trial_in_flight = false;
        inner.history.clear();
    }

    /// Get the breaker's configuration.
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Snapshot of the breaker's current signals.
    pub fn metrics(&self) -> BreakerMetrics {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();
        let failure_rate = inner.history.failure_rate(now);
        BreakerMetrics {
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            failure_rate,
            tracked_requests: inner.history.len(),
            cooldown_remaining: inner
                .next_attempt_at
                .map(|at| at.saturating_duration_since(now)),
        }
    }

    // Private methods

    /// Admission decision. Returns the remaining cool-down on rejection.
    fn admit(&self, now: Instant) -> Result<Admission, Duration> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            CircuitState::Closed => Ok(Admission::Normal),
            CircuitState::Open => {
                let due = inner.next_attempt_at.map_or(true, |at| now >= at);
                if due {
                    log::info!("circuit breaker transitioning to HalfOpen, admitting trial call");
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    Ok(Admission::Trial)
                } else {
                    let retry_after = inner
                        .next_attempt_at
                        .map_or(Duration::ZERO, |at| at.saturating_duration_since(now));
                    Err(retry_after)
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    // A probe is already out; everyone else waits.
                    Err(Duration::ZERO)
                } else {
                    inner.trial_in_flight = true;
                    Ok(Admission::Trial)
                }
            }
        }
    }

    fn on_success(&self, now: Instant, admission: Admission) {
        let mut inner = self.inner.lock().unwrap();
        if matches!(admission, Admission::Trial) {
            inner.trial_in_flight = false;
        }
        if inner.state != CircuitState::Closed {
            log::info!("circuit breaker closing after successful call");
        }
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.next_attempt_at = None;
        inner.history.record(now, Outcome::Success);
    }

    fn on_failure(&self, now: Instant, admission: Admission) {
        let mut inner = self.inner.lock().unwrap();
        let was_trial = matches!(admission, Admission::Trial);
        if was_trial {
            inner.trial_in_flight = false;
        }
        inner.consecutive_failures += 1;
        inner.history.record(now, Outcome::Failure);

        // A failed trial always re-opens; otherwise the consecutive-failure
        // threshold decides. Re-arming while already Open extends the
        // cool-down from the latest failure.
        if was_trial || inner.consecutive_failures >= self.config.failure_threshold {
            if inner.state != CircuitState::Open {
                log::warn!(
                    "circuit breaker tripping to Open after {} consecutive failures",
                    inner.consecutive_failures
                );
            }
            inner.state = CircuitState::Open;
            inner.next_attempt_at = Some(now + self.config.reset_timeout);
        }
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

/// Point-in-time snapshot of a breaker's signals.
#[derive(Debug, Clone)]
pub struct BreakerMetrics {
    /// Current state
    pub state: CircuitState,

    /// Consecutive failures since the last success
    pub consecutive_failures: u32,

    /// Rolling failure rate over the monitoring window
    pub failure_rate: f64,

    /// Number of requests currently inside the monitoring window
    pub tracked_requests: usize,

    /// Time until a trial call will be admitted, if the circuit is open
    pub cooldown_remaining: Option<Duration>,
}
