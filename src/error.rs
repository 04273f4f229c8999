//! Error types for the memoizer and the token broker
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Key Error ==
/// The call arguments could not be serialized into a cache key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unable to derive cache key: {0}")]
pub struct KeyError(String);

impl KeyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

// == Auth Error Enum ==
/// Failures of the JWT-bearer token flow.
///
/// Cloneable so that one failed in-flight fetch can be delivered to every
/// caller that joined it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Required configuration values are missing
    #[error("{0}")]
    ParameterValidation(String),

    /// The assertion could not be signed with the configured key
    #[error("{0}")]
    Signature(String),

    /// The token endpoint answered with a non-success status
    #[error("{0}")]
    TokenRequest(String),

    /// The token endpoint answered without a usable token
    #[error("{0}")]
    TokenResponse(String),

    /// The requested subject is not on the broker's allow-list
    #[error("Subject {0} is not allowed")]
    SubjectNotAllowed(String),

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The configuration could not be turned into a cache key
    #[error(transparent)]
    Key(#[from] KeyError),
}

impl AuthError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::ParameterValidation(_) => "PARAMETER_VALIDATION",
            AuthError::Signature(_) => "SIGNATURE",
            AuthError::SubjectNotAllowed(_) => "SUBJECT_NOT_ALLOWED",
            AuthError::TokenRequest(_) => "TOKEN_REQUEST",
            AuthError::TokenResponse(_) => "TOKEN_RESPONSE",
            AuthError::Transport(_) => "TRANSPORT",
            AuthError::Key(_) => "CACHE_KEY",
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::ParameterValidation(_) => StatusCode::BAD_REQUEST,
            AuthError::SubjectNotAllowed(_) => StatusCode::FORBIDDEN,
            AuthError::Signature(_) | AuthError::Key(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenRequest(_)
            | AuthError::TokenResponse(_)
            | AuthError::Transport(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(ErrorResponse::new(self.to_string(), self.kind()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the token flow.
pub type Result<T> = std::result::Result<T, AuthError>;
