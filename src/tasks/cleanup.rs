//! TTL Cleanup Task
//!
//! Background sweep that reclaims expired entries nobody reads again.
//! Reads already treat expired entries as absent, so correctness never
//! depends on this task running.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a task that sweeps expired entries from `cache` every `interval`.
///
/// The returned handle is aborted on shutdown.
///
/// # Example
/// ```ignore
/// let cache = paged_scrape::cache::shared::<String>(1000, Duration::from_secs(300));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: SharedCache<V>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.cleanup_expired();

            if removed > 0 {
                info!(removed, "TTL cleanup removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
