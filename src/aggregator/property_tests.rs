//! Property-Based Tests for the paged aggregator
//!
//! Pages are simulated in memory; async runs are driven with
//! `tokio_test::block_on`.

use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;

use crate::aggregator::{AggregateOptions, PageFetchResult, PagedAggregator};

/// (identity, page it came from)
type Item = (u8, u32);

/// Up to 12 pages of up to 6 items drawn from a small id space so that
/// duplicates across pages are common.
fn pages_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..20, 0..6), 1..12)
}

/// Per-page fetch latency in microseconds, so pages finish out of order.
fn delays_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..2_000, 12)
}

fn run(
    pages: &[Vec<u8>],
    delays: &[u64],
    failing: &HashSet<u32>,
    options: AggregateOptions,
) -> (Result<crate::aggregator::Aggregated<Item>, String>, usize) {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let total = pages.len() as u32;

    let result = tokio_test::block_on(PagedAggregator::new(options).fetch_all(
        |n| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            let items: Vec<Item> = pages
                .get(n as usize - 1)
                .map(|ids| ids.iter().map(|id| (*id, n)).collect())
                .unwrap_or_default();
            let fails = failing.contains(&n);
            let delay = Duration::from_micros(delays.get(n as usize - 1).copied().unwrap_or(200));
            async move {
                if n > 1 {
                    let now = in_flight.fetch_add(1, AtomicOrdering::SeqCst) + 1;
                    peak.fetch_max(now, AtomicOrdering::SeqCst);
                }
                tokio::time::sleep(delay).await;
                if n > 1 {
                    in_flight.fetch_sub(1, AtomicOrdering::SeqCst);
                }
                if fails {
                    Err(format!("page {n} failed"))
                } else {
                    Ok(PageFetchResult::new(n, items))
                }
            }
        },
        |_: &PageFetchResult<Item>| total,
        |item: &Item| item.0,
        |a: &Item, b: &Item| a.0.cmp(&b.0),
    ));

    (result, peak.load(AtomicOrdering::SeqCst))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Output ids are unique, sorted, and each kept item comes from the
    // earliest successful page that produced its id.
    #[test]
    fn prop_dedup_first_page_wins(pages in pages_strategy(), delays in delays_strategy()) {
        let (result, _) = run(&pages, &delays, &HashSet::new(), AggregateOptions::default());
        let result = result.unwrap();

        let ids: Vec<u8> = result.items.iter().map(|i| i.0).collect();
        let expected: Vec<u8> = pages.iter().flatten().copied().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(ids, expected);

        for (id, page) in &result.items {
            let first_page = pages.iter().position(|p| p.contains(id)).map(|i| i as u32 + 1);
            prop_assert_eq!(Some(*page), first_page);
        }
        prop_assert!(!result.partial);
    }

    // Failed later pages are reported and contribute nothing; everything
    // else is still merged.
    #[test]
    fn prop_partial_failure_tolerated(
        pages in pages_strategy(),
        failing in prop::collection::hash_set(2u32..12, 0..4),
        delays in delays_strategy()
    ) {
        let (result, _) = run(&pages, &delays, &failing, AggregateOptions::default());
        let result = result.unwrap();

        let mut expected_failed: Vec<u32> = failing
            .iter()
            .copied()
            .filter(|p| *p <= pages.len() as u32)
            .collect();
        expected_failed.sort_unstable();
        prop_assert_eq!(&result.failed_pages, &expected_failed);
        prop_assert_eq!(result.partial, !expected_failed.is_empty());

        let expected_ids: BTreeSet<u8> = pages
            .iter()
            .enumerate()
            .filter(|(i, _)| !failing.contains(&(*i as u32 + 1)))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        let ids: BTreeSet<u8> = result.items.iter().map(|i| i.0).collect();
        prop_assert_eq!(ids, expected_ids);
        prop_assert!(result.items.iter().all(|(_, page)| !failing.contains(page)));
    }

    // In-flight fetches for pages >= 2 never exceed the limit.
    #[test]
    fn prop_concurrency_bound(
        pages in pages_strategy(),
        limit in 1usize..5,
        delays in delays_strategy()
    ) {
        let options = AggregateOptions { concurrency_limit: limit, max_pages: 100 };
        let (result, peak) = run(&pages, &delays, &HashSet::new(), options);

        prop_assert!(result.is_ok());
        prop_assert!(peak <= limit, "peak {} > limit {}", peak, limit);
    }

    // Completion order of later pages never changes the output.
    #[test]
    fn prop_completion_order_irrelevant(
        pages in pages_strategy(),
        failing in prop::collection::hash_set(2u32..12, 0..3),
        delays in delays_strategy()
    ) {
        let reversed: Vec<u64> = delays.iter().rev().copied().collect();
        let (first, _) = run(&pages, &delays, &failing, AggregateOptions::default());
        let (second, _) = run(&pages, &reversed, &failing, AggregateOptions::default());
        let (steady, _) = run(&pages, &[], &failing, AggregateOptions::default());

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &steady);
    }

    // Page 1 failing fails the whole call.
    #[test]
    fn prop_first_page_failure_is_fatal(pages in pages_strategy()) {
        let failing: HashSet<u32> = [1].into_iter().collect();
        let (result, peak) = run(&pages, &[], &failing, AggregateOptions::default());

        prop_assert_eq!(result.unwrap_err(), "page 1 failed".to_string());
        prop_assert_eq!(peak, 0);
    }
}

#[test]
fn test_ten_pages_limit_three() {
    let pages: Vec<Vec<u8>> = (0..10u8).map(|i| vec![i]).collect();
    let options = AggregateOptions {
        concurrency_limit: 3,
        max_pages: 100,
    };

    let (result, peak) = run(&pages, &[], &HashSet::new(), options);

    assert_eq!(result.unwrap().items.len(), 10);
    assert_eq!(peak, 3);
}

#[test]
fn test_pages_one_to_five_with_three_failing() {
    let pages: Vec<Vec<u8>> = vec![vec![1], vec![2], vec![3], vec![4], vec![5]];
    let failing: HashSet<u32> = [3].into_iter().collect();

    // Later pages finish first
    let delays = [0, 1_500, 1_000, 500, 0];
    let (result, _) = run(&pages, &delays, &failing, AggregateOptions::default());
    let result = result.unwrap();

    assert_eq!(result.items, vec![(1, 1), (2, 2), (4, 4), (5, 5)]);
    assert_eq!(result.failed_pages, vec![3]);
}
