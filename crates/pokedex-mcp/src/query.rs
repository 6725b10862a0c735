/// Search and pagination over the cached catalog.
///
/// Everything here is a pure function of (entries, membership, query). The Pokédex state
/// calls [`derive_view`] after every mutation and on every read, so page clamping follows
/// any change that shrinks the result set.
use std::collections::HashSet;

use crate::model::{CatalogEntry, QueryState, PAGE_SIZE};

/// One page of the filtered catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView<'a> {
    pub entries: Vec<&'a CatalogEntry>,
    /// Entries passing both filters, across all pages.
    pub found: usize,
    /// The requested page clamped to `[1, total_pages]`.
    pub page: usize,
    pub total_pages: usize,
}

pub fn total_pages(found: usize) -> usize {
    found.div_ceil(PAGE_SIZE).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Entries in the membership set (when one is active) whose name contains the trimmed,
/// lower-cased search text, in cache order.
pub fn filter_entries<'a>(
    entries: &'a [CatalogEntry],
    membership: Option<&HashSet<String>>,
    search_text: &str,
) -> Vec<&'a CatalogEntry> {
    let query = search_text.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| membership.is_none_or(|names| names.contains(&e.name)))
        .filter(|e| query.is_empty() || e.name.to_lowercase().contains(&query))
        .collect()
}

pub fn derive_view<'a>(
    entries: &'a [CatalogEntry],
    membership: Option<&HashSet<String>>,
    query: &QueryState,
) -> FilteredView<'a> {
    let filtered = filter_entries(entries, membership, &query.search_text);
    let found = filtered.len();
    let total_pages = total_pages(found);
    let page = clamp_page(query.page, total_pages);

    let start = (page - 1) * PAGE_SIZE;
    let entries = filtered.into_iter().skip(start).take(PAGE_SIZE).collect();

    FilteredView {
        entries,
        found,
        page,
        total_pages,
    }
}
