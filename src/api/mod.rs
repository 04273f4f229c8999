//! API Module
//!
//! HTTP handlers and routing for the token broker REST API.
//!
//! # Endpoints
//! - `GET /token` - Fetch a (memoized) access token
//! - `DELETE /token` - Drop the cached token of a subject
//! - `GET /stats` - Get memoizer statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
