//! Error types for the scraper service
//!
//! Cache operations never fail; everything here comes from talking to the
//! upstream site or from bad client input.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Scrape Error Enum ==
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Bad client input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A listing path or base URL that does not form a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    /// Upstream body exceeded the configured size cap
    #[error("Upstream body for {url} exceeds {limit} bytes")]
    ResponseTooLarge { url: String, limit: usize },

    /// Upstream did not answer within the fetch timeout
    #[error("Upstream timed out: {0}")]
    Timeout(String),

    /// Connection or body read failure
    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScrapeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScrapeError::InvalidRequest(_) | ScrapeError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            ScrapeError::UpstreamStatus { .. }
            | ScrapeError::ResponseTooLarge { .. }
            | ScrapeError::Network(_) => StatusCode::BAD_GATEWAY,
            ScrapeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ScrapeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            ScrapeError::Timeout(url)
        } else if let Some(status) = err.status() {
            ScrapeError::UpstreamStatus {
                url,
                status: status.as_u16(),
            }
        } else if err.is_builder() {
            ScrapeError::InvalidUrl(err.to_string())
        } else {
            ScrapeError::Network(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
pub type Result<T> = std::result::Result<T, ScrapeError>;
