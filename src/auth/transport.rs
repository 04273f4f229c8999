//! HTTP transport used to reach the token endpoint.

use async_trait::async_trait;

use crate::error::{AuthError, Result};

/// Raw answer of the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// == Token Transport ==
/// Sends a form-encoded POST and returns status and body.
///
/// Non-success statuses are not errors at this layer; only failing to get a
/// response at all is.
#[async_trait]
pub trait TokenTransport: Send + Sync {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<TransportResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Uses a preconfigured client, e.g. one with a request timeout.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenTransport for HttpTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(302, "").is_success());
        assert!(!TransportResponse::new(400, "").is_success());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let transport = HttpTransport::with_client(client);
        let err = transport
            .post_form("http://127.0.0.1:1/services/oauth2/token", &[("a", "b")])
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Transport(_)));
    }
}
