//! Rolling window of request outcomes
//!
//! Backs the breaker's rolling failure rate. Entries older than the
//! monitoring period are pruned on every write and on every rate read, so
//! the window never grows unbounded.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    Failure,
}

#[derive(Debug)]
pub(crate) struct RequestHistory {
    window: Duration,
    entries: VecDeque<(Instant, Outcome)>,
}

impl RequestHistory {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            entries: VecDeque::new(),
        }
    }

    /// Record an outcome observed at `now`, dropping entries that have
    /// fallen out of the window.
    pub(crate) fn record(&mut self, now: Instant, outcome: Outcome) {
        self.prune(now);
        self.entries.push_back((now, outcome));
    }

    pub(crate) fn prune(&mut self, now: Instant) {
        while let Some(&(at, _)) = self.entries.front() {
            if now.saturating_duration_since(at) > self.window {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Failures over total within the window, or 0.0 when the window is
    /// empty.
    pub(crate) fn failure_rate(&mut self, now: Instant) -> f64 {
        self.prune(now);
        if self.entries.is_empty() {
            return 0.0;
        }
        let failures = self
            .entries
            .iter()
            .filter(|(_, outcome)| *outcome == Outcome::Failure)
            .count();
        failures as f64 / self.entries.len() as f64
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_has_zero_rate() {
        let mut history = RequestHistory::new(Duration::from_secs(60));
        assert_eq!(history.failure_rate(Instant::now()), 0.0);
    }

    #[test]
    fn rate_reflects_mix_within_window() {
        let mut history = RequestHistory::new(Duration::from_secs(60));
        let now = Instant::now();

        history.record(now, Outcome::Failure);
        history.record(now, Outcome::Success);
        history.record(now, Outcome::Failure);
        history.record(now, Outcome::Failure);

        assert_eq!(history.failure_rate(now), 0.75);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn entries_outside_window_are_pruned() {
        let window = Duration::from_secs(10);
        let mut history = RequestHistory::new(window);
        let start = Instant::now();
        let later = start + Duration::from_secs(30);

        // Two failures that will be stale by `later`, then a fresh success.
        history.record(start, Outcome::Failure);
        history.record(start, Outcome::Failure);
        history.record(later, Outcome::Success);

        assert_eq!(history.failure_rate(later), 0.0);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn clear_empties_the_window() {
        let mut history = RequestHistory::new(Duration::from_secs(60));
        let now = Instant::now();
        history.record(now, Outcome::Failure);

        history.clear();

        assert_eq!(history.len(), 0);
        assert_eq!(history.failure_rate(now), 0.0);
    }
}
