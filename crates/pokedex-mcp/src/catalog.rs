/// In-memory holder of the full catalog list.
///
/// The list is requested exactly once per session. A failed load leaves the cache empty and
/// records a user-visible error; there is no retry or refresh.
use std::collections::HashSet;

use pokedex_common::error::CommonError;
use pokedex_common::pokeapi::NamedResource;
use tracing::{info, warn};

use crate::model::CatalogEntry;

pub const LIST_LOAD_ERROR: &str = "Failed to load Pokémon list.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    NotStarted,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug)]
pub struct ListCache {
    status: ListStatus,
    entries: Vec<CatalogEntry>,
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ListCache {
    pub fn new() -> Self {
        Self {
            status: ListStatus::NotStarted,
            entries: Vec::new(),
        }
    }

    /// Mark the load as started. Returns `false` if it was already started once.
    pub fn begin(&mut self) -> bool {
        if self.status != ListStatus::NotStarted {
            return false;
        }
        self.status = ListStatus::Loading;
        true
    }

    pub fn complete(&mut self, result: Result<Vec<NamedResource>, CommonError>) {
        match result {
            Ok(resources) => {
                self.entries = build_entries(resources);
                self.status = ListStatus::Loaded;
                info!(entries = self.entries.len(), "catalog list loaded");
            }
            Err(e) => {
                warn!(error = %e, "catalog list load failed");
                self.entries.clear();
                self.status = ListStatus::Failed;
            }
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, ListStatus::NotStarted | ListStatus::Loading)
    }

    pub fn error(&self) -> Option<&'static str> {
        (self.status == ListStatus::Failed).then_some(LIST_LOAD_ERROR)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

/// Convert list rows into catalog entries, keeping the first occurrence of a repeated name.
pub fn build_entries(resources: Vec<NamedResource>) -> Vec<CatalogEntry> {
    let mut seen = HashSet::with_capacity(resources.len());
    resources
        .into_iter()
        .filter(|r| seen.insert(r.name.clone()))
        .map(|r| CatalogEntry {
            name: r.name,
            detail_url: r.url,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resource(name: &str, url: &str) -> NamedResource {
        NamedResource {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn keeps_order_and_drops_duplicate_names() {
        let entries = build_entries(vec![
            resource("bulbasaur", "u1"),
            resource("ivysaur", "u2"),
            resource("bulbasaur", "u3"),
        ]);
        let pairs: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.detail_url.as_str())).collect();
        assert_eq!(pairs, vec![("bulbasaur", "u1"), ("ivysaur", "u2")]);
    }

    #[test]
    fn loads_only_once() {
        let mut cache = ListCache::new();
        assert!(cache.is_loading());
        assert!(cache.begin());
        cache.complete(Ok(vec![resource("mew", "u151")]));
        assert_eq!(cache.status(), ListStatus::Loaded);
        assert!(!cache.begin());
        assert_eq!(cache.find("MEW").map(|e| e.detail_url.as_str()), Some("u151"));
    }

    #[test]
    fn failure_leaves_cache_empty_with_error() {
        let mut cache = ListCache::new();
        assert!(cache.begin());
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        cache.complete(Err(CommonError::InvalidJson(err)));
        assert!(cache.entries().is_empty());
        assert!(!cache.is_loading());
        assert_eq!(cache.error(), Some(LIST_LOAD_ERROR));
        assert!(!cache.begin());
    }
}
