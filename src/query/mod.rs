//! Pure query/filter primitives over entry sequences (spec.md §4.5).

pub mod time;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::entry::Entry;

/// Entries with `created_at >= cutoff` (inclusive).
pub fn filter_since(entries: Vec<Entry>, cutoff: DateTime<Utc>) -> Vec<Entry> {
    let before = entries.len();
    let kept: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| entry.created_at >= cutoff)
        .collect();
    tracing::debug!(%cutoff, before, after = kept.len(), "filter_since");
    kept
}

/// Entries with `created_at <= cutoff` (inclusive).
pub fn filter_until(entries: Vec<Entry>, cutoff: DateTime<Utc>) -> Vec<Entry> {
    let before = entries.len();
    let kept: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| entry.created_at <= cutoff)
        .collect();
    tracing::debug!(%cutoff, before, after = kept.len(), "filter_until");
    kept
}

/// OR-match against a query tag set. An empty query is the identity filter.
pub fn filter_by_tags(entries: Vec<Entry>, tags: &[String]) -> Vec<Entry> {
    if tags.is_empty() {
        return entries;
    }
    let before = entries.len();
    let query: HashSet<&str> = tags.iter().map(|tag| tag.as_str()).collect();
    let kept: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| entry.tags.iter().any(|tag| query.contains(tag.as_str())))
        .collect();
    tracing::debug!(tags = tags.len(), before, after = kept.len(), "filter_by_tags");
    kept
}

/// Sorts newest-first by `created_at`.
pub fn sort_by_created_at_desc(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tracing::debug!(count = entries.len(), "sort_by_created_at_desc");
    entries
}

/// First `n` entries, or all of them if there are fewer than `n`. Callers
/// apply this after sorting.
pub fn top_n(mut entries: Vec<Entry>, n: usize) -> Vec<Entry> {
    let before = entries.len();
    entries.truncate(n);
    tracing::debug!(before, n, after = entries.len(), "top_n");
    entries
}
