//! Cache Module
//!
//! In-memory response cache with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod memo;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use memo::{get_or_try_insert_with, shared, Lookup, SharedCache};
pub use stats::CacheStats;
pub use store::ResponseCache;
