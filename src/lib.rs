//! Token Memo - async memoization with TTL expiry and single-flight calls
//!
//! Provides a generic memoizer for async functions and a JWT-bearer token
//! broker built on top of it.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod memo;
pub mod models;

pub use api::AppState;
pub use config::Config;
pub use error::{AuthError, KeyError};
pub use memo::{memoize, MemoOptions, Memoizer};
