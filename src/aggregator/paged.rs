//! Paged Aggregator Module
//!
//! Paged listing aggregation.
//!
//! Page 1 is fetched first to learn the page count; the remaining pages are
//! fetched in bounded batches, merged in page order, deduplicated and sorted.

use std::cmp::Ordering;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::batch::fetch_batched;
use super::ordering::dedup_by_identity;

/// Default number of simultaneous page fetches.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 3;

/// Default ceiling on the page count, whatever the pagination claims.
pub const DEFAULT_MAX_PAGES: u32 = 100;

// == Page Result ==
/// One fetched page of a listing.
pub trait PageResult {
    type Item;

    /// 1-based page index.
    fn page_number(&self) -> u32;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Plain page: its number and its items.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFetchResult<T> {
    pub page_number: u32,
    pub items: Vec<T>,
}

impl<T> PageFetchResult<T> {
    pub fn new(page_number: u32, items: Vec<T>) -> Self {
        Self { page_number, items }
    }
}

impl<T> PageResult for PageFetchResult<T> {
    type Item = T;

    fn page_number(&self) -> u32 {
        self.page_number
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

// == Options ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Max simultaneous fetches for pages 2..N. 0 behaves as 1.
    pub concurrency_limit: usize,
    /// Hard ceiling on the detected page count.
    pub max_pages: u32,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

// == Aggregated ==
/// Merged listing plus which pages, if any, were lost along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregated<T> {
    pub items: Vec<T>,
    /// Page count after clamping to `max_pages`
    pub total_pages: u32,
    /// Pages whose fetch failed, ascending
    pub failed_pages: Vec<u32>,
    /// `true` when `failed_pages` is non-empty
    pub partial: bool,
}

// == Paged Aggregator ==
#[derive(Debug, Clone, Default)]
pub struct PagedAggregator {
    options: AggregateOptions,
}

impl PagedAggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> AggregateOptions {
        self.options
    }

    /// Fetches every page of a listing and returns the merged items.
    ///
    /// * `fetch_page(n)` - loads 1-based page `n`
    /// * `detect_total_pages(&page1)` - page count as claimed by page 1;
    ///   values below 1 are read as 1, values above `max_pages` are capped
    /// * `identity_key_of(&item)` - dedup key; the earliest page wins
    /// * `compare_order(a, b)` - final ordering, applied with a stable sort
    ///
    /// A failure on page 1 is returned as-is. Failures on later pages are
    /// logged, reported in [`Aggregated::failed_pages`] and otherwise skipped.
    pub async fn fetch_all<P, E, F, Fut, D, K, Id, C>(
        &self,
        fetch_page: F,
        detect_total_pages: D,
        identity_key_of: K,
        compare_order: C,
    ) -> Result<Aggregated<P::Item>, E>
    where
        P: PageResult,
        E: Display,
        F: Fn(u32) -> Fut,
        Fut: Future<Output = Result<P, E>>,
        D: FnOnce(&P) -> u32,
        K: FnMut(&P::Item) -> Id,
        Id: Eq + Hash,
        C: FnMut(&P::Item, &P::Item) -> Ordering,
    {
        let first = fetch_page(1).await?;

        let detected = detect_total_pages(&first);
        let total_pages = detected.clamp(1, self.options.max_pages.max(1));
        if detected > total_pages {
            warn!(
                detected,
                max_pages = self.options.max_pages,
                "page count exceeds ceiling, truncating"
            );
        }

        let mut merged = first.into_items();
        let mut failed_pages = Vec::new();

        if total_pages > 1 {
            debug!(
                total_pages,
                concurrency_limit = self.options.concurrency_limit,
                "fetching remaining pages"
            );

            let results =
                fetch_batched(2..=total_pages, self.options.concurrency_limit, &fetch_page).await;

            for (page, result) in results {
                match result {
                    Ok(fetched) => {
                        if fetched.page_number() != page {
                            debug!(requested = page, returned = fetched.page_number(), "page number mismatch");
                        }
                        merged.extend(fetched.into_items());
                    }
                    Err(e) => {
                        warn!(page, error = %e, "page fetch failed, skipping");
                        failed_pages.push(page);
                    }
                }
            }
        }

        let fetched_count = merged.len();
        let mut items = dedup_by_identity(merged, identity_key_of);
        items.sort_by(compare_order);

        info!(
            total_pages,
            fetched = fetched_count,
            unique = items.len(),
            failed = failed_pages.len(),
            "aggregation complete"
        );

        Ok(Aggregated {
            items,
            total_pages,
            partial: !failed_pages.is_empty(),
            failed_pages,
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    type Item = (&'static str, u32);

    /// Canned pages keyed by number; missing pages fail.
    fn pages(data: Vec<(u32, Vec<Item>)>) -> HashMap<u32, Vec<Item>> {
        data.into_iter().collect()
    }

    fn by_seq(a: &Item, b: &Item) -> Ordering {
        a.1.cmp(&b.1)
    }

    #[tokio::test]
    async fn test_single_page_fetches_once() {
        let calls = AtomicUsize::new(0);
        let data = pages(vec![(1, vec![("b", 2), ("a", 1), ("b", 3)])]);

        let result = PagedAggregator::default()
            .fetch_all(
                |n| {
                    calls.fetch_add(1, AtomicOrdering::SeqCst);
                    let items = data.get(&n).cloned();
                    async move { items.map(|i| PageFetchResult::new(n, i)).ok_or("missing") }
                },
                |_| 1,
                |item: &Item| item.0,
                by_seq,
            )
            .await
            .unwrap();

        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(result.items, vec![("a", 1), ("b", 2)]);
        assert_eq!(result.total_pages, 1);
        assert!(!result.partial);
    }

    #[tokio::test]
    async fn test_first_page_failure_propagates() {
        let result = PagedAggregator::default()
            .fetch_all(
                |_| async { Err::<PageFetchResult<Item>, _>("connection refused") },
                |_| 5,
                |item: &Item| item.0,
                by_seq,
            )
            .await;

        assert_eq!(result.unwrap_err(), "connection refused");
    }

    #[tokio::test]
    async fn test_duplicate_keeps_page_one_item() {
        let data = pages(vec![
            (1, vec![("x", 1), ("y", 2)]),
            (2, vec![("x", 99), ("z", 3)]),
        ]);

        let result = PagedAggregator::default()
            .fetch_all(
                |n| {
                    let items = data.get(&n).cloned();
                    async move { items.map(|i| PageFetchResult::new(n, i)).ok_or("missing") }
                },
                |_| 2,
                |item: &Item| item.0,
                by_seq,
            )
            .await
            .unwrap();

        assert_eq!(result.items, vec![("x", 1), ("y", 2), ("z", 3)]);
    }

    #[tokio::test]
    async fn test_later_page_failure_is_partial() {
        let data = pages(vec![
            (1, vec![("a", 1)]),
            (2, vec![("b", 2)]),
            (4, vec![("d", 4)]),
            (5, vec![("e", 5)]),
        ]);

        let result = PagedAggregator::default()
            .fetch_all(
                |n| {
                    let items = data.get(&n).cloned();
                    async move { items.map(|i| PageFetchResult::new(n, i)).ok_or("timed out") }
                },
                |_| 5,
                |item: &Item| item.0,
                by_seq,
            )
            .await
            .unwrap();

        assert_eq!(result.items, vec![("a", 1), ("b", 2), ("d", 4), ("e", 5)]);
        assert_eq!(result.failed_pages, vec![3]);
        assert!(result.partial);
        assert_eq!(result.total_pages, 5);
    }

    #[tokio::test]
    async fn test_page_count_is_capped() {
        let calls = AtomicUsize::new(0);
        let aggregator = PagedAggregator::new(AggregateOptions {
            concurrency_limit: 4,
            max_pages: 7,
        });

        let result = aggregator
            .fetch_all(
                |n| {
                    calls.fetch_add(1, AtomicOrdering::SeqCst);
                    async move { Ok::<_, String>(PageFetchResult::new(n, vec![n])) }
                },
                |_| 10_000,
                |item: &u32| *item,
                |a: &u32, b: &u32| a.cmp(b),
            )
            .await
            .unwrap();

        assert_eq!(calls.load(AtomicOrdering::SeqCst), 7);
        assert_eq!(result.total_pages, 7);
        assert_eq!(result.items, (1..=7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_zero_detected_pages_reads_as_one() {
        let result = PagedAggregator::default()
            .fetch_all(
                |n| async move { Ok::<_, String>(PageFetchResult::new(n, vec![n])) },
                |_| 0,
                |item: &u32| *item,
                |a: &u32, b: &u32| a.cmp(b),
            )
            .await
            .unwrap();

        assert_eq!(result.total_pages, 1);
        assert_eq!(result.items, vec![1]);
    }

    #[tokio::test]
    async fn test_detect_sees_first_page() {
        let result = PagedAggregator::default()
            .fetch_all(
                |n| async move {
                    Ok::<_, String>(PageFetchResult::new(n, vec![format!("p{n}")]))
                },
                |first: &PageFetchResult<String>| first.items.len() as u32 + 2,
                |item: &String| item.clone(),
                |a: &String, b: &String| b.cmp(a),
            )
            .await
            .unwrap();

        assert_eq!(result.items, vec!["p3", "p2", "p1"]);
    }
}
