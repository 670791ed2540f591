//! Request and Response models for the scraper API

pub mod requests;
pub mod responses;

pub use requests::ListingQuery;
pub use responses::{HealthResponse, InvalidateResponse, ListingResponse, StatsResponse};
