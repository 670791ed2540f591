//! Ordering Module
//!
//! Dedup and ordering helpers shared by listing aggregations.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::OnceLock;

use regex::Regex;

// == Dedup ==
/// Keeps the first item for each identity key, preserving order.
pub fn dedup_by_identity<T, K, F>(items: Vec<T>, mut key_of: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(key_of(item)))
        .collect()
}

// == Sequence Numbers ==
fn trailing_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\D*$").expect("static regex"))
}

/// Trailing integer of a title or slug: `"naruto-episode-12"` → `Some(12)`.
pub fn sequence_number(text: &str) -> Option<u32> {
    trailing_number()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// == Ordering ==
/// Ascending by sequence number; unnumbered items last; ties by title.
pub fn by_sequence_then_title(
    a_seq: Option<u32>,
    a_title: &str,
    b_seq: Option<u32>,
    b_title: &str,
) -> Ordering {
    let seq = match (a_seq, b_seq) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    seq.then_with(|| a_title.cmp(b_title))
}
