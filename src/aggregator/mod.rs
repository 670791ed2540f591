//! Aggregator Module
//!
//! Bounded-concurrency retrieval of paginated listings with dedup and a
//! deterministic final order.

mod batch;
pub mod ordering;
mod paged;

#[cfg(test)]
mod property_tests;

pub use batch::fetch_batched;
pub use paged::{
    AggregateOptions, Aggregated, PageFetchResult, PageResult, PagedAggregator,
    DEFAULT_CONCURRENCY_LIMIT, DEFAULT_MAX_PAGES,
};
