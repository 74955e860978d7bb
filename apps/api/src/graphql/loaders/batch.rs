//! Request-scoped batch loader
//!
//! [`BatchLoader`] collects the individual `load(key)` calls that GraphQL
//! resolvers issue while a query is being executed, coalesces them into one
//! call of a [`BatchFn`] per accumulation window, and fans the results back
//! out to every caller. Results (including "no such row") are cached by key
//! for the lifetime of the loader, which is one request.
//!
//! A window opens when the first uncached key is registered and closes once
//! no new key has been registered for a whole [`BatchConfig::delay`], or as
//! soon as it holds [`BatchConfig::max_batch_size`] distinct keys. A large
//! list whose resolvers keep registering keys across several scheduler
//! turns therefore still lands in one window. Keys registered while a window
//! is in flight join that window's result instead of being queried again.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::future::try_join_all;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// Failure of a whole batch window
///
/// Every caller waiting on the window receives a clone of the same error.
/// Failures are never cached: a later `load` of the same key is retried in a
/// new window.
#[derive(Debug, Clone, Error)]
pub enum LoaderError {
    /// The store rejected or could not run the batch query
    #[error("database error: {0}")]
    Database(Arc<sqlx::Error>),

    /// The dispatching task was torn down before the batch completed
    #[error("batch load was cancelled before it completed")]
    Cancelled,

    /// `load` was called outside of a Tokio runtime
    #[error("no async runtime available to dispatch the batch")]
    NoRuntime,
}

impl From<sqlx::Error> for LoaderError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(Arc::new(err))
    }
}

/// Result of loading one key: `Ok(None)` means the key has no row
pub type LoadResult<V> = Result<Option<V>, LoaderError>;

/// Batch function a [`BatchLoader`] dispatches each window to
///
/// `keys` are distinct and in first-requested order. Keys missing from the
/// returned map are reported to callers (and cached) as absent.
pub trait BatchFn: Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Send + Sync + 'static;
    type Value: Clone + Send + Sync + 'static;

    fn load(
        &self,
        keys: &[Self::Key],
    ) -> impl Future<Output = Result<HashMap<Self::Key, Self::Value>, LoaderError>> + Send;
}

/// Accumulation window settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Quiet period without new keys that closes a window; zero yields once
    pub delay: Duration,
    /// Dispatch immediately once a window holds this many keys
    pub max_batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1),
            max_batch_size: 500,
        }
    }
}

type Waiter<V> = oneshot::Sender<LoadResult<V>>;

struct State<K, V> {
    /// Resolved keys, absent ones included
    cache: HashMap<K, Option<V>>,
    /// Keys of the open window in first-requested order
    pending: Vec<K>,
    /// Callers per key for the open window and for windows in flight
    waiters: HashMap<K, Vec<Waiter<V>>>,
    /// A timer task is waiting to close the open window
    window_scheduled: bool,
    /// Bumped by every registration that has to wait for a window
    registrations: u64,
}

impl<K, V> Default for State<K, V> {
    fn default() -> Self {
        Self {
            cache: HashMap::new(),
            pending: Vec::new(),
            waiters: HashMap::new(),
            window_scheduled: false,
            registrations: 0,
        }
    }
}

struct Inner<F: BatchFn> {
    batch_fn: F,
    config: BatchConfig,
    state: Mutex<State<F::Key, F::Value>>,
    dispatched: AtomicUsize,
}

impl<F: BatchFn> Inner<F> {
    fn state(&self) -> MutexGuard<'_, State<F::Key, F::Value>> {
        // A poisoned lock only means another caller panicked mid-update; the
        // maps themselves stay structurally valid.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

enum Registration<V> {
    Ready(LoadResult<V>),
    Waiting(oneshot::Receiver<LoadResult<V>>),
}

/// Batching, caching loader bound to one request
///
/// Cloning is cheap and clones share the same pending window and cache.
pub struct BatchLoader<F: BatchFn> {
    inner: Arc<Inner<F>>,
}

impl<F: BatchFn> Clone for BatchLoader<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: BatchFn> BatchLoader<F> {
    /// Create a loader with the default window settings
    pub fn new(batch_fn: F) -> Self {
        Self::with_config(batch_fn, BatchConfig::default())
    }

    pub fn with_config(batch_fn: F, config: BatchConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                batch_fn,
                config: BatchConfig {
                    max_batch_size: config.max_batch_size.max(1),
                    ..config
                },
                state: Mutex::new(State::default()),
                dispatched: AtomicUsize::new(0),
            }),
        }
    }

    /// Load one key
    ///
    /// The key is registered when this method is called, not when the
    /// returned future is first polled, so several handles can be created
    /// and then awaited together and still land in the same window. A
    /// cached key resolves without touching the pending window.
    pub fn load(&self, key: F::Key) -> impl Future<Output = LoadResult<F::Value>> + Send + 'static {
        let registration = self.register(key);
        async move {
            match registration {
                Registration::Ready(result) => result,
                Registration::Waiting(rx) => rx.await.unwrap_or(Err(LoaderError::Cancelled)),
            }
        }
    }

    /// Load several keys, returning results in input order
    ///
    /// Duplicate keys are queried once and every position receives the value.
    pub async fn load_many<I>(&self, keys: I) -> Result<Vec<Option<F::Value>>, LoaderError>
    where
        I: IntoIterator<Item = F::Key>,
    {
        let handles: Vec<_> = keys.into_iter().map(|key| self.load(key)).collect();
        try_join_all(handles).await
    }

    /// Drop the cached result for `key`
    ///
    /// The next `load` of the key goes to the store again. Windows already
    /// waiting on the key are unaffected.
    pub fn clear(&self, key: &F::Key) {
        self.inner.state().cache.remove(key);
    }

    /// Number of windows handed to the batch function so far
    pub fn batches_dispatched(&self) -> usize {
        self.inner.dispatched.load(Ordering::Relaxed)
    }

    fn register(&self, key: F::Key) -> Registration<F::Value> {
        let mut state = self.inner.state();

        if let Some(value) = state.cache.get(&key) {
            return Registration::Ready(Ok(value.clone()));
        }

        let (tx, rx) = oneshot::channel();
        if let Some(waiters) = state.waiters.get_mut(&key) {
            // Already pending in the open window or in flight
            waiters.push(tx);
            state.registrations = state.registrations.wrapping_add(1);
            return Registration::Waiting(rx);
        }

        let Ok(runtime) = Handle::try_current() else {
            return Registration::Ready(Err(LoaderError::NoRuntime));
        };

        state.registrations = state.registrations.wrapping_add(1);
        state.waiters.insert(key.clone(), vec![tx]);
        state.pending.push(key);

        if state.pending.len() >= self.inner.config.max_batch_size {
            let keys = mem::take(&mut state.pending);
            drop(state);
            runtime.spawn(dispatch(Arc::clone(&self.inner), keys));
        } else if !state.window_scheduled {
            state.window_scheduled = true;
            drop(state);
            runtime.spawn(close_window(Arc::clone(&self.inner)));
        }

        Registration::Waiting(rx)
    }
}

/// Keep the window open while keys are still arriving, then dispatch it
///
/// The window is re-armed for another `delay` every time a check finds
/// registrations that were not there at the previous check.
async fn close_window<F: BatchFn>(inner: Arc<Inner<F>>) {
    let mut seen = inner.state().registrations;

    let keys = loop {
        if inner.config.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(inner.config.delay).await;
        }

        let mut state = inner.state();
        if state.registrations != seen && !state.pending.is_empty() {
            seen = state.registrations;
            continue;
        }
        state.window_scheduled = false;
        break mem::take(&mut state.pending);
    };

    // A full window may already have been dispatched early
    if !keys.is_empty() {
        dispatch(inner, keys).await;
    }
}

/// Releases a window's waiters if its dispatch is dropped before completing
///
/// Dropping the senders wakes every receiver with `Cancelled`.
struct WindowGuard<F: BatchFn> {
    inner: Arc<Inner<F>>,
    keys: Vec<F::Key>,
    completed: bool,
}

impl<F: BatchFn> Drop for WindowGuard<F> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let mut state = self.inner.state();
        for key in &self.keys {
            state.waiters.remove(key);
        }
    }
}

async fn dispatch<F: BatchFn>(inner: Arc<Inner<F>>, keys: Vec<F::Key>) {
    inner.dispatched.fetch_add(1, Ordering::Relaxed);
    let mut guard = WindowGuard {
        inner: Arc::clone(&inner),
        keys,
        completed: false,
    };

    let result = inner.batch_fn.load(&guard.keys).await;

    let mut state = inner.state();
    match result {
        Ok(mut values) => {
            for key in &guard.keys {
                let value = values.remove(key);
                state.cache.insert(key.clone(), value.clone());
                for waiter in state.waiters.remove(key).unwrap_or_default() {
                    // The caller may have stopped waiting
                    let _ = waiter.send(Ok(value.clone()));
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, keys = guard.keys.len(), "Batch load failed");
            for key in &guard.keys {
                for waiter in state.waiters.remove(key).unwrap_or_default() {
                    let _ = waiter.send(Err(err.clone()));
                }
            }
        }
    }
    drop(state);

    guard.completed = true;
}
