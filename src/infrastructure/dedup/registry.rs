use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::ApiError;

/// A shared handle to an in-flight operation. Every caller that joined
/// before settlement observes the same outcome.
pub type PendingResult<T> = Shared<BoxFuture<'static, Result<T, ApiError>>>;

struct InflightEntry<T> {
    generation: u64,
    pending: PendingResult<T>,
    expiry: JoinHandle<()>,
}

struct Inner<T> {
    ttl: Duration,
    next_generation: Mutex<u64>,
    entries: Mutex<HashMap<String, InflightEntry<T>>>,
}

impl<T> Inner<T> {
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, InflightEntry<T>>> {
        // The map is only touched in short critical sections that cannot
        // panic, but recover from poisoning anyway rather than propagate it.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Removes the entry for `key` only if it still belongs to the
    /// operation identified by `generation`. Keeps a stale operation that
    /// outlived its expiry window from evicting a successor entry when it
    /// finally settles.
    fn remove_generation(&self, key: &str, generation: u64) {
        let mut entries = self.lock_entries();
        if entries
            .get(key)
            .is_some_and(|entry| entry.generation == generation)
        {
            if let Some(entry) = entries.remove(key) {
                entry.expiry.abort();
            }
        }
    }
}

/// Collapses concurrent identical requests into one underlying operation.
///
/// The first `get_or_create` for a key runs the producer and registers the
/// resulting shared future; callers arriving while it is outstanding join
/// it instead of starting another operation. The entry is dropped when the
/// operation settles (success or failure) or, as a backstop against missed
/// cleanup, when a per-entry expiry timer fires. A key freed by the timer
/// accepts a fresh operation even if the old one is still running.
///
/// Construct one per consumer and inject it; there is no global instance.
pub struct RequestCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for RequestCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for RequestCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("ttl", &self.inner.ttl)
            .field("in_flight", &self.len())
            .finish()
    }
}

/// Expiry window matching the original deployment's tuning.
pub const DEFAULT_INFLIGHT_TTL: Duration = Duration::from_secs(5);

impl<T> RequestCache<T> {
    /// Creates a cache whose entries expire after `ttl` if never settled.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                ttl,
                next_generation: Mutex::new(0),
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Whether an operation is currently registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock_entries().contains_key(key)
    }

    /// Drops the entry for `key`, cancelling its expiry timer. The
    /// underlying operation, if still running, is not interrupted.
    pub fn remove(&self, key: &str) {
        if let Some(entry) = self.inner.lock_entries().remove(key) {
            entry.expiry.abort();
        }
    }

    /// Number of operations currently in flight.
    pub fn len(&self) -> usize {
        self.inner.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> RequestCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Returns the in-flight result registered under `key`, or runs
    /// `producer` and registers its shared handle.
    pub fn get_or_create<F, Fut>(&self, key: &str, producer: F) -> PendingResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut entries = self.inner.lock_entries();

        if let Some(entry) = entries.get(key) {
            debug!(key, "joining in-flight request");
            return entry.pending.clone();
        }

        debug!(key, "registering new in-flight request");
        let generation = {
            let mut next = self
                .inner
                .next_generation
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            *next += 1;
            *next
        };

        let operation = producer();
        let cleanup = Arc::clone(&self.inner);
        let cleanup_key = key.to_string();
        let pending: PendingResult<T> = async move {
            let outcome = operation.await;
            cleanup.remove_generation(&cleanup_key, generation);
            outcome
        }
        .boxed()
        .shared();

        let guard = Arc::clone(&self.inner);
        let guard_key = key.to_string();
        let ttl = self.inner.ttl;
        let expiry = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            debug!(key = %guard_key, "in-flight entry expired before settling");
            guard.remove_generation(&guard_key, generation);
        });

        entries.insert(
            key.to_string(),
            InflightEntry {
                generation,
                pending: pending.clone(),
                expiry,
            },
        );

        pending
    }
}
