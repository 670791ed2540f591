//! Shared cache handle and the read-through helper handlers use.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::ResponseCache;

/// Process-wide cache handle.
///
/// Reads take the write lock too: a hit updates LRU order, and the entry
/// map and order tracker must change together.
pub type SharedCache<V> = Arc<RwLock<ResponseCache<V>>>;

/// Wraps a fresh cache in a [`SharedCache`].
pub fn shared<V: Clone>(capacity: usize, default_ttl: Duration) -> SharedCache<V> {
    Arc::new(RwLock::new(ResponseCache::new(capacity, default_ttl)))
}

/// Outcome of [`get_or_try_insert_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<V> {
    pub value: V,
    /// `true` when the value came from the cache
    pub cached: bool,
}

/// Returns the cached value for `key`, or runs `compute` and caches its result.
///
/// The lock is not held while `compute` runs, so two concurrent misses on the
/// same key may both compute; the later `set` wins. `should_store` lets the
/// caller keep a result out of the cache (e.g. a partial listing). Errors are
/// never cached.
pub async fn get_or_try_insert_with<V, E, F, Fut>(
    cache: &SharedCache<V>,
    key: &str,
    ttl: Option<Duration>,
    should_store: impl FnOnce(&V) -> bool,
    compute: F,
) -> Result<Lookup<V>, E>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(value) = cache.write().await.get(key) {
        debug!(key, "cache hit");
        return Ok(Lookup {
            value,
            cached: true,
        });
    }

    debug!(key, "cache miss");
    let value = compute().await?;

    if should_store(&value) {
        cache.write().await.set(key, value.clone(), ttl);
    } else {
        debug!(key, "result not cached");
    }

    Ok(Lookup {
        value,
        cached: false,
    })
}
