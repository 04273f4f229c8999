//! Response DTOs for the token broker API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::memo::MemoStats;

/// Response body for DELETE /token
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Subject whose cached token was targeted
    pub sub: String,
    /// Whether a cached token was actually dropped
    pub invalidated: bool,
}

impl InvalidateResponse {
    pub fn new(sub: impl Into<String>, invalidated: bool) -> Self {
        Self {
            sub: sub.into(),
            invalidated,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Requests answered from a cached token
    pub hits: u64,
    /// Requests that performed a token exchange
    pub misses: u64,
    /// Requests that joined an exchange already in flight
    pub coalesced: u64,
    /// Exchanges that failed
    pub failures: u64,
    /// Tokens currently cached
    pub cached_tokens: usize,
    /// Exchanges currently in flight
    pub pending_requests: usize,
    /// Share of requests served without a new exchange
    pub hit_rate: f64,
}

impl From<MemoStats> for StatsResponse {
    fn from(stats: MemoStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            coalesced: stats.coalesced,
            failures: stats.failures,
            cached_tokens: stats.cached_entries,
            pending_requests: stats.pending_calls,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Machine-readable error kind
    pub kind: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.into(),
        }
    }
}
