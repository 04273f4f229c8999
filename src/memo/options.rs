//! Memoization Options
//!
//! TTL policy applied to successful results.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

type TtlFn<A> = Arc<dyn Fn(&A) -> Duration + Send + Sync>;

// == Memo Options ==
/// TTL configuration for a [`Memoizer`](super::Memoizer).
///
/// A dynamic TTL (`with_ttl_fn`) overrides the static one (`with_ttl`). When
/// the resolved TTL is zero the cached value never expires.
pub struct MemoOptions<A> {
    ttl: Option<Duration>,
    ttl_fn: Option<TtlFn<A>>,
}

impl<A> MemoOptions<A> {
    /// Creates options with no TTL: results are cached forever.
    pub fn new() -> Self {
        Self {
            ttl: None,
            ttl_fn: None,
        }
    }

    /// Applies the same TTL to every successful result.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Computes the TTL from the call arguments.
    pub fn with_ttl_fn<F>(mut self, ttl_fn: F) -> Self
    where
        F: Fn(&A) -> Duration + Send + Sync + 'static,
    {
        self.ttl_fn = Some(Arc::new(ttl_fn));
        self
    }

    /// Resolves the TTL for one call.
    pub fn resolve_ttl(&self, args: &A) -> Duration {
        match (&self.ttl_fn, self.ttl) {
            (Some(ttl_fn), _) => ttl_fn(args),
            (None, Some(ttl)) => ttl,
            (None, None) => Duration::ZERO,
        }
    }
}

impl<A> Default for MemoOptions<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for MemoOptions<A> {
    fn clone(&self) -> Self {
        Self {
            ttl: self.ttl,
            ttl_fn: self.ttl_fn.clone(),
        }
    }
}

impl<A> fmt::Debug for MemoOptions<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoOptions")
            .field("ttl", &self.ttl)
            .field("ttl_fn", &self.ttl_fn.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
