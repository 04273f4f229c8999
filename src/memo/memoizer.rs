//! Memoizer Module
//!
//! Wraps an async function with a TTL cache and an in-flight registry so that
//! concurrent calls with equal arguments share a single invocation.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::KeyError;
use crate::memo::key::{self, derive_key};
use crate::memo::{CacheEntry, MemoOptions, MemoStats};

type CallFn<A, T, E> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;
type PendingCall<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Both mappings live behind one lock so that "check cache, check pending,
/// register" is a single critical section.
struct MemoState<T, E> {
    cache: HashMap<String, CacheEntry<T>>,
    pending: HashMap<String, PendingCall<T, E>>,
    stats: MemoStats,
}

struct Inner<A, T, E> {
    func: CallFn<A, T, E>,
    options: MemoOptions<A>,
    state: Mutex<MemoState<T, E>>,
}

/// How an invocation settled, without the panic payload.
enum Settled<T> {
    Value(T),
    Failed,
    Panicked,
}

// == Memoizer ==
/// A memoized async function.
///
/// Cloning is cheap and every clone shares the same cache; each call to
/// [`memoize`] creates an independent one.
pub struct Memoizer<A, T, E> {
    inner: Arc<Inner<A, T, E>>,
}

impl<A, T, E> Clone for Memoizer<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Wraps `func` in a [`Memoizer`] configured by `options`.
///
/// # Example
/// ```ignore
/// let fetch = memoize(
///     |id: u32| async move { Ok::<_, MyError>(format!("data:{id}")) },
///     MemoOptions::new().with_ttl(Duration::from_secs(1)),
/// );
/// assert_eq!(fetch.call(1).await?, "data:1");
/// ```
pub fn memoize<A, T, E, F, Fut>(func: F, options: MemoOptions<A>) -> Memoizer<A, T, E>
where
    A: Serialize + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<KeyError> + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    Memoizer::new(func, options)
}

impl<A, T, E> Memoizer<A, T, E>
where
    A: Serialize + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<KeyError> + 'static,
{
    // == Constructor ==
    pub fn new<F, Fut>(func: F, options: MemoOptions<A>) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let func: CallFn<A, T, E> = Arc::new(move |args| func(args).boxed());

        Self {
            inner: Arc::new(Inner {
                func,
                options,
                state: Mutex::new(MemoState {
                    cache: HashMap::new(),
                    pending: HashMap::new(),
                    stats: MemoStats::new(),
                }),
            }),
        }
    }

    // == Call ==
    /// Calls the wrapped function through the cache.
    ///
    /// 1. A fresh cache entry for the arguments is returned as is.
    /// 2. Otherwise an in-flight invocation for the same arguments is joined.
    /// 3. Otherwise the function is invoked and registered as in flight.
    ///
    /// Errors from the wrapped function reach every joined caller unchanged
    /// and are never cached. A `KeyError` is returned before the function is
    /// invoked if the arguments cannot be serialized.
    pub async fn call(&self, args: A) -> Result<T, E> {
        let key = derive_key(&args)?;

        let call = {
            let mut state = self.inner.state.lock().await;

            let fresh = state
                .cache
                .get(&key)
                .filter(|entry| entry.is_fresh())
                .map(|entry| (entry.value.clone(), entry.ttl_remaining()));
            if let Some((value, remaining)) = fresh {
                state.stats.record_hit();
                debug!(key = key::short(&key), remaining = ?remaining, "memo hit");
                return Ok(value);
            }

            if let Some(pending) = state.pending.get(&key).cloned() {
                state.stats.record_coalesced();
                debug!(key = key::short(&key), "joining in-flight call");
                pending
            } else {
                state.stats.record_miss();
                debug!(key = key::short(&key), "memo miss, invoking");
                let call = self.start(key.clone(), args);
                state.pending.insert(key, call.clone());
                drive(call.clone());
                call
            }
        };

        call.await
    }

    /// Invokes the wrapped function and returns the shareable handle whose
    /// completion settles the cache and the pending registry.
    ///
    /// The handle is also driven by [`drive`], so it settles even when every
    /// caller stops polling it.
    fn start(&self, key: String, args: A) -> PendingCall<T, E> {
        let started = Instant::now();
        let ttl_args = args.clone();
        let call = (self.inner.func)(args);
        let inner: Weak<Inner<A, T, E>> = Arc::downgrade(&self.inner);

        async move {
            let outcome = AssertUnwindSafe(call).catch_unwind().await;

            let settled = match &outcome {
                Ok(Ok(value)) => Settled::Value(value.clone()),
                Ok(Err(_)) => Settled::Failed,
                Err(_) => Settled::Panicked,
            };
            if let Some(inner) = inner.upgrade() {
                inner.settle(&key, &ttl_args, started, settled).await;
            }

            match outcome {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        .boxed()
        .shared()
    }

    // == Stats ==
    /// Returns a snapshot of the counters and mapping sizes.
    pub async fn stats(&self) -> MemoStats {
        let state = self.inner.state.lock().await;
        let mut stats = state.stats.clone();
        stats.cached_entries = state.cache.len();
        stats.pending_calls = state.pending.len();
        stats
    }

    // == Invalidate ==
    /// Drops the cached result for `args`, if any.
    ///
    /// An invocation already in flight for these arguments is unaffected and
    /// will store its result when it settles.
    pub async fn invalidate(&self, args: &A) -> Result<bool, KeyError> {
        let key = derive_key(args)?;
        let mut state = self.inner.state.lock().await;
        Ok(state.cache.remove(&key).is_some())
    }

    // == Purge Expired ==
    /// Removes every stale entry and returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.inner.state.lock().await;
        let before = state.cache.len();
        state.cache.retain(|_, entry| entry.is_fresh_at(now));
        before - state.cache.len()
    }

    /// Drops every cached result.
    pub async fn clear(&self) {
        self.inner.state.lock().await.cache.clear();
    }

    /// Number of cached entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.inner.state.lock().await.cache.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Polls a registered call to completion on the current runtime.
///
/// Without a runtime the call is left to its callers.
fn drive<T, E>(call: PendingCall<T, E>)
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        // A panic is already reported to the polling callers.
        handle.spawn(AssertUnwindSafe(call).catch_unwind().map(drop));
    }
}

impl<A, T, E> Inner<A, T, E> {
    /// Clears the pending entry and, on success, stores the value.
    async fn settle(&self, key: &str, args: &A, started: Instant, settled: Settled<T>) {
        let mut state = self.state.lock().await;
        state.pending.remove(key);

        match settled {
            Settled::Value(value) => {
                let ttl = self.options.resolve_ttl(args);
                state
                    .cache
                    .insert(key.to_string(), CacheEntry::new(value, started, ttl));
                info!(key = key::short(key), ttl = ?ttl, "memoized call settled");
            }
            Settled::Failed => {
                state.stats.record_failure();
                warn!(key = key::short(key), "memoized call failed, result not cached");
            }
            Settled::Panicked => {
                state.stats.record_failure();
                warn!(key = key::short(key), "memoized call panicked, result not cached");
            }
        }
    }
}
