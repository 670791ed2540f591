//! Listing Module
//!
//! Turns one fetched listing page into items plus the pagination hints
//! needed to size the rest of the listing.

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::aggregator::ordering::{by_sequence_then_title, sequence_number};
use crate::aggregator::PageResult;
use crate::error::{Result, ScrapeError};
use crate::scrape::pagination::{detect_total_pages, PaginationHints};

// == Listing Item ==
/// One entry of a listing (an episode, a show in a category, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingItem {
    /// Last path segment of `url`; not unique across site sections
    pub id: String,
    pub title: String,
    /// Resolved link without fragment; the dedup identity of the item
    pub url: String,
    /// Trailing number of the title or id, if any
    pub sequence: Option<u32>,
}

impl ListingItem {
    /// Canonical listing order: by sequence, then title.
    pub fn canonical_order(a: &Self, b: &Self) -> std::cmp::Ordering {
        by_sequence_then_title(a.sequence, &a.title, b.sequence, &b.title)
    }
}

// == Listing Page ==
/// A parsed listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub page_number: u32,
    pub items: Vec<ListingItem>,
    pub pagination: PaginationHints,
}

impl ListingPage {
    /// Page count claimed by this page's pagination block.
    pub fn total_pages(&self) -> u32 {
        detect_total_pages(&self.pagination)
    }
}

impl PageResult for ListingPage {
    type Item = ListingItem;

    fn page_number(&self) -> u32 {
        self.page_number
    }

    fn into_items(self) -> Vec<ListingItem> {
        self.items
    }
}

/// Site-relative path of page `n` of a listing: `path/` or `path/page/n/`.
pub fn page_path(path: &str, page: u32) -> String {
    let path = path.trim_matches('/');
    if page <= 1 {
        format!("{path}/")
    } else {
        format!("{path}/page/{page}/")
    }
}

// == Listing Parser ==
/// CSS selectors describing listing markup.
#[derive(Debug, Clone)]
pub struct ListingParser {
    item: Selector,
    pagination: Selector,
}

impl ListingParser {
    pub fn new(item_selector: &str, pagination_selector: &str) -> Result<Self> {
        Ok(Self {
            item: parse_selector(item_selector)?,
            pagination: parse_selector(pagination_selector)?,
        })
    }

    /// Parses one listing page fetched from `page_url`.
    ///
    /// Elements matching the item selector without a usable `href` are
    /// skipped. Relative links are resolved against `page_url`.
    pub fn parse(&self, html: &str, page_number: u32, page_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);

        let items = document
            .select(&self.item)
            .filter_map(|element| item_from_element(&element, page_url))
            .collect();

        ListingPage {
            page_number,
            items,
            pagination: PaginationHints::extract(&document, &self.pagination),
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::InvalidRequest(format!("invalid selector {selector:?}: {e:?}")))
}

fn item_from_element(element: &ElementRef<'_>, base: &Url) -> Option<ListingItem> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let mut url = base.join(href).ok()?;
    url.set_fragment(None);

    let id = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()?
        .to_string();

    let text = element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");
    let title = if text.is_empty() {
        element.value().attr("title").unwrap_or(&id).trim().to_string()
    } else {
        text
    };

    let sequence = sequence_number(&title).or_else(|| sequence_number(&id));

    Some(ListingItem {
        id,
        title,
        url: url.to_string(),
        sequence,
    })
}
