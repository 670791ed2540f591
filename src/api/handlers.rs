//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue},
    Json,
};
use tracing::info;

use crate::cache::{self, get_or_try_insert_with, SharedCache};
use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::models::requests::validate_listing_path;
use crate::models::{HealthResponse, InvalidateResponse, ListingQuery, ListingResponse, StatsResponse};
use crate::scrape::ListingScraper;

/// Response header telling whether a listing came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached listing responses
    pub cache: SharedCache<ListingResponse>,
    pub scraper: Arc<ListingScraper>,
}

impl AppState {
    pub fn new(cache: SharedCache<ListingResponse>, scraper: ListingScraper) -> Self {
        Self {
            cache,
            scraper: Arc::new(scraper),
        }
    }

    /// Builds the cache and scraper from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = cache::shared(config.max_entries, config.default_ttl());
        Ok(Self::new(cache, ListingScraper::from_config(config)?))
    }
}

/// Cache key of a listing path.
pub fn listing_cache_key(path: &str) -> String {
    format!("listing:{}", path.trim_matches('/'))
}

/// Handler for GET /listing/*path
///
/// Serves the aggregated listing from the cache, fetching it on a miss.
/// Partial listings are returned but not cached.
pub async fn listing_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<([(HeaderName, HeaderValue); 1], Json<ListingResponse>)> {
    if let Some(error_msg) = validate_listing_path(&path) {
        return Err(ScrapeError::InvalidRequest(error_msg));
    }

    let path = path.trim_matches('/');
    let key = listing_cache_key(path);

    if query.refresh {
        state.cache.write().await.delete(&key);
    }

    let scraper = &state.scraper;
    let lookup = get_or_try_insert_with(
        &state.cache,
        &key,
        query.ttl.map(Duration::from_secs),
        |response: &ListingResponse| !response.partial,
        || async move {
            let listing = scraper.fetch_listing(path).await?;
            Ok::<_, ScrapeError>(ListingResponse::new(path, listing))
        },
    )
    .await?;

    let status = if lookup.cached { "HIT" } else { "MISS" };
    Ok((
        [(HeaderName::from_static(CACHE_STATUS_HEADER), HeaderValue::from_static(status))],
        Json(lookup.value),
    ))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for DELETE /cache/:key
///
/// Idempotent: deleting an absent key succeeds.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.write().await.delete(&key);
    Json(InvalidateResponse::key(&key, removed))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = {
        let mut cache = state.cache.write().await;
        let removed = cache.len();
        cache.clear();
        removed
    };
    info!(removed, "cache cleared");
    Json(InvalidateResponse::cleared(removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
