//! # Quote Collection Policy
//!
//! Ordering and identity rules for the persisted quote collection. The store
//! crate does the I/O; these functions decide what the collection looks like
//! after every load or mutation.
//!
//! - Ordering: `lastModified` descending (ties keep no particular order).
//! - Identity: `estimateId` is the merge key. Uniqueness is the caller's job.

use crate::types::Quote;
use crate::ESTIMATE_ID_PREFIX;

/// Outcome of [`upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Formats the store key for an estimate number: `QQ<n>`.
pub fn estimate_id(number: u64) -> String {
    format!("{}{}", ESTIMATE_ID_PREFIX, number)
}

/// Extracts `n` from `QQ<n>`.
pub fn parse_estimate_number(estimate_id: &str) -> Option<u64> {
    estimate_id.strip_prefix(ESTIMATE_ID_PREFIX)?.parse().ok()
}

/// One past the highest `QQ<n>` in the collection (1 when empty).
pub fn next_estimate_number(quotes: &[Quote]) -> u64 {
    quotes
        .iter()
        .filter_map(|q| parse_estimate_number(&q.estimate_id))
        .max()
        .map_or(1, |n| n + 1)
}

/// Sorts most recently modified first.
pub fn sort_most_recent_first(quotes: &mut [Quote]) {
    quotes.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}

/// Inserts `quote`, or replaces the entry with the same `estimateId` in
/// place while keeping that entry's `createdAt`. Re-sorts afterwards.
pub fn upsert(quotes: &mut Vec<Quote>, mut quote: Quote) -> Upsert {
    let outcome = match quotes.iter().position(|q| q.estimate_id == quote.estimate_id) {
        Some(index) => {
            quote.created_at = quotes[index].created_at;
            quotes[index] = quote;
            Upsert::Replaced
        }
        None => {
            quotes.push(quote);
            Upsert::Inserted
        }
    };
    sort_most_recent_first(quotes);
    outcome
}

/// Removes the entry keyed `estimate_id`; returns it if present.
pub fn remove(quotes: &mut Vec<Quote>, estimate_id: &str) -> Option<Quote> {
    let index = quotes.iter().position(|q| q.estimate_id == estimate_id)?;
    Some(quotes.remove(index))
}

pub fn find<'a>(quotes: &'a [Quote], estimate_id: &str) -> Option<&'a Quote> {
    quotes.iter().find(|q| q.estimate_id == estimate_id)
}
