//! Request and Response models for the token broker API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP query strings and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::TokenQuery;
pub use responses::{ErrorResponse, HealthResponse, InvalidateResponse, StatsResponse};
