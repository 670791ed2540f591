//! Request DTOs for the scraper API

use serde::Deserialize;

/// Longest listing path accepted, in bytes
pub const MAX_PATH_LENGTH: usize = 256;

/// Query string of `GET /listing/*path`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    /// Skip the cache lookup and fetch fresh (the result is still cached)
    #[serde(default)]
    pub refresh: bool,
    /// Cache TTL in seconds for this result (default TTL when absent)
    #[serde(default)]
    pub ttl: Option<u64>,
}

/// Checks a listing path taken from the URL.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_listing_path(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Some("Listing path cannot be empty".to_string());
    }
    if trimmed.len() > MAX_PATH_LENGTH {
        return Some(format!(
            "Listing path exceeds maximum length of {MAX_PATH_LENGTH} characters"
        ));
    }
    if trimmed.split('/').any(|segment| segment == ".." || segment == ".") {
        return Some("Listing path cannot contain relative segments".to_string());
    }
    // A scheme-like first segment ("https:host") or a backslash would let
    // URL joining leave the upstream site
    let first_segment = trimmed.split('/').next().unwrap_or_default();
    if trimmed.contains(['?', '#', '\\']) || first_segment.contains(':') {
        return Some("Listing path must be a plain site-relative path".to_string());
    }
    None
}
