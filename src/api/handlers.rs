//! API Handlers
//!
//! HTTP request handlers for each token broker endpoint.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::warn;

use crate::auth::{create_get_token, SalesforceConfig, TokenFetcher, TokenOutput, TokenTransport};
use crate::error::{AuthError, Result};
use crate::models::{HealthResponse, InvalidateResponse, StatsResponse, TokenQuery};

/// Application state shared across all handlers.
///
/// The fetcher is cheap to clone; every clone shares one token cache.
#[derive(Clone)]
pub struct AppState {
    /// Memoized token fetcher
    pub tokens: TokenFetcher,
    /// Credentials used when a request does not override the subject
    pub credentials: Arc<SalesforceConfig>,
    /// Subjects a request may override the configured one with
    pub allowed_subjects: Arc<HashSet<String>>,
}

impl AppState {
    /// Creates a new AppState around an existing fetcher.
    ///
    /// Only the configured subject is served until
    /// [`with_allowed_subjects`](Self::with_allowed_subjects) widens it.
    pub fn new(tokens: TokenFetcher, credentials: SalesforceConfig) -> Self {
        Self {
            tokens,
            credentials: Arc::new(credentials),
            allowed_subjects: Arc::new(HashSet::new()),
        }
    }

    /// Creates a new AppState with a fresh fetcher over `transport`.
    pub fn with_transport(transport: Arc<dyn TokenTransport>, credentials: SalesforceConfig) -> Self {
        Self::new(create_get_token(transport), credentials)
    }

    /// Permits `?sub=` overrides for the given subjects.
    pub fn with_allowed_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_subjects = Arc::new(subjects.into_iter().map(Into::into).collect());
        self
    }

    fn resolve(&self, query: &TokenQuery) -> Result<SalesforceConfig> {
        if let Some(error_msg) = query.validate() {
            return Err(AuthError::ParameterValidation(error_msg));
        }
        if let Some(sub) = query.overrides(&self.credentials) {
            if !self.allowed_subjects.contains(sub) {
                warn!(sub = %sub, "rejected subject override");
                return Err(AuthError::SubjectNotAllowed(sub.to_string()));
            }
        }
        Ok(query.apply(&self.credentials))
    }
}

/// Handler for GET /token
///
/// Returns the cached token for the subject, fetching one if needed.
pub async fn token_handler(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenOutput>> {
    let config = state.resolve(&query)?;
    let token = state.tokens.call(config).await?;

    Ok(Json(token))
}

/// Handler for DELETE /token
///
/// Drops the cached token so the next request performs a fresh exchange.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<InvalidateResponse>> {
    let config = state.resolve(&query)?;
    let invalidated = state.tokens.invalidate(&config).await?;

    Ok(Json(InvalidateResponse::new(config.sub, invalidated)))
}

/// Handler for GET /stats
///
/// Returns current memoizer statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.tokens.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
