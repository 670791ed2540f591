//! API Module
//!
//! HTTP handlers and routing for the scraper service.
//!
//! # Endpoints
//! - `GET /listing/*path` - Aggregated listing, served through the cache
//! - `GET /stats` - Cache statistics
//! - `DELETE /cache/:key` - Invalidate one cached response
//! - `DELETE /cache` - Invalidate everything
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
