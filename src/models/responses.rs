//! Response DTOs for the scraper API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregated;
use crate::cache::CacheStats;
use crate::scrape::ListingItem;

/// Response body for `GET /listing/*path`. This is also what gets cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResponse {
    /// Listing path relative to the upstream root
    pub path: String,
    pub total_pages: u32,
    /// `true` when some pages could not be fetched
    pub partial: bool,
    pub failed_pages: Vec<u32>,
    pub item_count: usize,
    pub items: Vec<ListingItem>,
}

impl ListingResponse {
    pub fn new(path: impl Into<String>, listing: Aggregated<ListingItem>) -> Self {
        Self {
            path: path.into(),
            total_pages: listing.total_pages,
            partial: listing.partial,
            failed_pages: listing.failed_pages,
            item_count: listing.items.len(),
            items: listing.items,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            size: stats.size,
            capacity: stats.capacity,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
        }
    }
}

/// Response body for `DELETE /cache/:key` and `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    /// Entries actually removed
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn key(key: &str, removed: bool) -> Self {
        let message = if removed {
            format!("Key '{key}' invalidated")
        } else {
            format!("Key '{key}' was not cached")
        };
        Self {
            message,
            removed: usize::from(removed),
        }
    }

    pub fn cleared(removed: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
