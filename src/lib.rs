//! Paged Scrape - listing scraper service with a response cache
//!
//! Aggregates paginated upstream listings with bounded concurrency and
//! serves them through an in-memory cache with TTL expiration and LRU
//! eviction.

pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod scrape;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
