//! Memoizer Statistics Module
//!
//! Tracks how calls were served: from cache, by joining an in-flight call, or
//! by invoking the wrapped function.

use serde::Serialize;

// == Memo Stats ==
/// Counters describing a memoizer's traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoStats {
    /// Calls answered from a fresh cache entry
    pub hits: u64,
    /// Calls that invoked the wrapped function
    pub misses: u64,
    /// Calls that joined an in-flight invocation
    pub coalesced: u64,
    /// Invocations that settled with an error or panicked
    pub failures: u64,
    /// Entries currently held, including stale ones not yet looked up
    pub cached_entries: usize,
    /// Invocations currently in flight
    pub pending_calls: usize,
}

impl MemoStats {
    /// Creates a new MemoStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Fraction of calls that avoided invoking the wrapped function.
    ///
    /// Returns (hits + coalesced) / total calls, or 0.0 before any call.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.coalesced + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits + self.coalesced) as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_coalesced(&mut self) {
        self.coalesced += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = MemoStats::new();
        assert_eq!(stats, MemoStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_counts_joins_as_saved_work() {
        let mut stats = MemoStats::new();
        stats.record_miss();
        stats.record_coalesced();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_failures_do_not_affect_hit_rate() {
        let mut stats = MemoStats::new();
        stats.record_miss();
        stats.record_failure();
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.hit_rate(), 0.0);
    }
}
