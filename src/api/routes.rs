//! API Routes
//!
//! Configures the Axum router with all token broker endpoints.

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{
    health_handler, invalidate_handler, stats_handler, token_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /token` - Fetch a (memoized) access token
/// - `DELETE /token` - Drop the cached token of a subject
/// - `GET /stats` - Get memoizer statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows only `allowed_origins`; none when the list is empty
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/token", get(token_handler).delete(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) if origin != "*" => Some(value),
            _ => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::DELETE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SalesforceConfig, TokenTransport, TransportResponse};
    use crate::error::Result;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    struct FailingTransport;

    #[async_trait]
    impl TokenTransport for FailingTransport {
        async fn post_form(&self, _url: &str, _form: &[(&str, &str)]) -> Result<TransportResponse> {
            Ok(TransportResponse::new(500, "upstream down"))
        }
    }

    fn create_test_app() -> Router {
        let credentials = SalesforceConfig {
            iss: String::new(),
            sub: String::new(),
            aud: "https://example.salesforce.com".to_string(),
            key: String::new(),
            exp_minutes: 30,
        };
        create_router(
            AppState::with_transport(Arc::new(FailingTransport), credentials),
            &["https://console.example.com".to_string()],
        )
    }

    fn health_from(origin: &str) -> Request<Body> {
        Request::builder()
            .uri("/health")
            .header("origin", origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let response = create_test_app()
            .oneshot(health_from("https://console.example.com"))
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://console.example.com"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_other_origins() {
        let response = create_test_app()
            .oneshot(health_from("https://evil.example.net"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_with_missing_credentials() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
