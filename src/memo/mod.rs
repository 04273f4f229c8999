//! Memo Module
//!
//! Async memoization with per-call TTL expiry and coalescing of concurrent
//! duplicate calls into a single in-flight invocation.

mod entry;
mod key;
mod memoizer;
mod options;
mod stats;


// Re-export public types
pub use entry::CacheEntry;
pub use key::derive_key;
pub use memoizer::{memoize, Memoizer};
pub use options::MemoOptions;
pub use stats::MemoStats;
