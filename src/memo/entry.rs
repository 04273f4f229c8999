//! Cache Entry Module
//!
//! Defines a memoized result together with its expiry instant.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A settled, successful result stored under one key.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The memoized value
    pub value: T,
    /// Instant the producing call was initiated
    pub created_at: Instant,
    /// Expiration instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry for a call initiated at `started`.
    ///
    /// A zero `ttl` yields an entry that never expires.
    pub fn new(value: T, started: Instant, ttl: Duration) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(started + ttl)
        };

        Self {
            value,
            created_at: started,
            expires_at,
        }
    }

    // == Is Fresh ==
    /// Checks whether the entry may still be served at `now`.
    ///
    /// An entry is valid strictly before its expiry instant; once the TTL has
    /// fully elapsed it is stale.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now < expires,
            None => true,
        }
    }

    /// Checks freshness against the current instant.
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_zero_ttl_never_expires() {
        let entry = CacheEntry::new("value", Instant::now(), Duration::ZERO);

        assert!(entry.expires_at.is_none());
        assert!(entry.ttl_remaining().is_none());

        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;
        assert!(entry.is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new("value", Instant::now(), Duration::from_millis(1000));
        assert!(entry.is_fresh());

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(entry.is_fresh());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!entry.is_fresh(), "entry must be stale once ttl fully elapsed");
        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_measured_from_call_start() {
        let started = Instant::now();
        tokio::time::advance(Duration::from_millis(400)).await;

        // Settled 400ms after the call began; still expires 1s after the start.
        let entry = CacheEntry::new(1u8, started, Duration::from_secs(1));
        assert_eq!(entry.expires_at, Some(started + Duration::from_secs(1)));
        assert_eq!(entry.ttl_remaining(), Some(Duration::from_millis(600)));
    }

    #[test]
    fn test_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "test",
            created_at: now,
            expires_at: Some(now),
        };

        assert!(!entry.is_fresh_at(now), "entry should be stale at boundary");
    }
}
