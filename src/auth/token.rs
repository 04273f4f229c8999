//! Token exchange and its memoized entry point.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{sign_assertion, validate_config, SalesforceConfig, TokenTransport};
use crate::error::{AuthError, Result};
use crate::memo::{memoize, MemoOptions, Memoizer};

pub const TOKEN_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const TOKEN_ENDPOINT: &str = "services/oauth2/token";

/// Memoized token fetcher keyed by the full credential set.
pub type TokenFetcher = Memoizer<SalesforceConfig, TokenOutput, AuthError>;

// == Token Output ==
/// Successful token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenOutput {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Token endpoint for a login URL.
pub fn token_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), TOKEN_ENDPOINT)
}

/// How long a fetched token is reused: one minute less than the assertion
/// lifetime. Zero, which disables expiry, when `exp_minutes` is 0 or 1.
pub fn token_ttl(config: &SalesforceConfig) -> Duration {
    Duration::from_secs(u64::from(config.exp_minutes.saturating_sub(1)) * 60)
}

/// Runs the full, unmemoized flow for one credential set.
pub async fn fetch_token<T>(transport: &T, config: SalesforceConfig) -> Result<TokenOutput>
where
    T: TokenTransport + ?Sized,
{
    let claims = validate_config(&config)?;
    let assertion = sign_assertion(&claims, &config.key)?;
    let token = request_token(transport, &config.aud, &assertion).await?;

    info!(sub = %config.sub, "access token issued");
    Ok(token)
}

async fn request_token<T>(transport: &T, base_url: &str, assertion: &str) -> Result<TokenOutput>
where
    T: TokenTransport + ?Sized,
{
    let url = token_url(base_url);
    let form = [("grant_type", TOKEN_GRANT_TYPE), ("assertion", assertion)];

    debug!(url = %url, "requesting access token");
    let response = transport.post_form(&url, &form).await?;

    if !response.is_success() {
        // Pretty-print JSON error bodies, pass anything else through as is.
        let data = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|json| serde_json::to_string_pretty(&json).ok())
            .unwrap_or_else(|| response.body.clone());

        return Err(AuthError::TokenRequest(format!(
            "Token request failed: status {}, data: {}",
            response.status, data
        )));
    }

    let json: Value = serde_json::from_str(&response.body).map_err(|e| {
        AuthError::TokenResponse(format!("Token response is not valid JSON: {e}"))
    })?;

    if json.get("access_token").is_none() {
        return Err(AuthError::TokenResponse(
            "Token response does not contain access_token value".to_string(),
        ));
    }

    serde_json::from_value(json)
        .map_err(|e| AuthError::TokenResponse(format!("Unable to parse token response: {e}")))
}

// == Create Get Token ==
/// Builds the memoized fetcher over `transport`.
///
/// Concurrent requests for the same credentials share one exchange, and the
/// resulting token is served from cache for [`token_ttl`].
pub fn create_get_token(transport: Arc<dyn TokenTransport>) -> TokenFetcher {
    memoize(
        move |config: SalesforceConfig| {
            let transport = Arc::clone(&transport);
            async move { fetch_token(transport.as_ref(), config).await }
        },
        MemoOptions::new().with_ttl_fn(token_ttl),
    )
}
