//! Scrape Module
//!
//! Upstream collaborators of the aggregator: fetching HTML, parsing listing
//! pages, and guessing their page count.

pub mod fetcher;
pub mod listing;
pub mod pagination;
mod service;

pub use fetcher::HtmlFetcher;
pub use listing::{ListingItem, ListingPage, ListingParser};
pub use pagination::{detect_total_pages, PaginationHints};
pub use service::ListingScraper;
