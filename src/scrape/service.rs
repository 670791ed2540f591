//! Listing Scraper Module
//!
//! Fetcher, parser and aggregator wired together into whole-listing fetches.

use tracing::{info, instrument};

use crate::aggregator::{Aggregated, PagedAggregator};
use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::scrape::fetcher::HtmlFetcher;
use crate::scrape::listing::{page_path, ListingItem, ListingPage, ListingParser};

// == Listing Scraper ==
/// Fetches complete, deduplicated listings from the upstream site.
#[derive(Debug, Clone)]
pub struct ListingScraper {
    fetcher: HtmlFetcher,
    parser: ListingParser,
    aggregator: PagedAggregator,
}

impl ListingScraper {
    // == Constructor ==
    pub fn new(fetcher: HtmlFetcher, parser: ListingParser, aggregator: PagedAggregator) -> Self {
        Self {
            fetcher,
            parser,
            aggregator,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            HtmlFetcher::new(&config.upstream_base_url, config.fetch_timeout())?
                .with_max_body_bytes(config.max_body_bytes),
            ListingParser::new(&config.item_selector, &config.pagination_selector)?,
            PagedAggregator::new(config.aggregate_options()),
        ))
    }

    // == Fetch Page ==
    /// Fetches and parses one page of the listing at `path`.
    pub async fn fetch_page(&self, path: &str, page: u32) -> Result<ListingPage> {
        let url = self.fetcher.resolve(&page_path(path, page))?;
        let html = self.fetcher.fetch(&url).await?;
        Ok(self.parser.parse(&html, page, &url))
    }

    // == Fetch Listing ==
    /// Every item of the listing at `path`, across all of its pages.
    ///
    /// Items are deduplicated by resolved URL, so equal slugs in different
    /// sections of the site stay distinct.
    #[instrument(skip(self))]
    pub async fn fetch_listing(&self, path: &str) -> Result<Aggregated<ListingItem>> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(ScrapeError::InvalidRequest("listing path cannot be empty".to_string()));
        }

        let listing = self
            .aggregator
            .fetch_all(
                |page| self.fetch_page(path, page),
                |first: &ListingPage| first.total_pages(),
                |item: &ListingItem| item.url.clone(),
                ListingItem::canonical_order,
            )
            .await?;

        info!(
            path,
            items = listing.items.len(),
            total_pages = listing.total_pages,
            partial = listing.partial,
            "listing fetched"
        );

        Ok(listing)
    }
}
