/// Type filter: resolves the membership set for the selected category.
///
/// Every specific selection takes a new generation ticket. Only the response carrying the
/// current ticket may touch state; responses for superseded selections are dropped, whatever
/// order the network delivers them in.
use std::collections::HashSet;

use pokedex_common::error::CommonError;
use pokedex_common::pokeapi::NamedResource;
use tracing::{debug, info, warn};

use crate::model::Category;

pub const CATEGORY_LOAD_ERROR: &str = "Failed to filter by type.";

/// Identity of one in-flight membership request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTicket {
    generation: u64,
    category: Category,
}

impl CategoryTicket {
    pub fn category(&self) -> Category {
        self.category
    }
}

#[derive(Debug, Default)]
pub struct TypeFilter {
    generation: u64,
    membership: Option<HashSet<String>>,
    loading: bool,
    error: Option<&'static str>,
}

impl TypeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a selection. "all" clears the filter immediately and returns `None`; any other
    /// category discards the current membership, enters the loading state and returns the
    /// ticket the response must present.
    pub fn select(&mut self, category: Category) -> Option<CategoryTicket> {
        self.generation += 1;
        self.membership = None;
        if category.is_all() {
            self.loading = false;
            self.error = None;
            return None;
        }
        self.loading = true;
        Some(CategoryTicket {
            generation: self.generation,
            category,
        })
    }

    pub fn is_current(&self, ticket: &CategoryTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a membership response. Returns `true` only if the ticket was current and the
    /// request succeeded.
    pub fn complete(
        &mut self,
        ticket: CategoryTicket,
        result: Result<Vec<NamedResource>, CommonError>,
    ) -> bool {
        if !self.is_current(&ticket) {
            debug!(category = %ticket.category, "dropping stale category response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(members) => {
                let names: HashSet<String> = members.into_iter().map(|m| m.name).collect();
                info!(category = %ticket.category, members = names.len(), "category membership loaded");
                self.membership = Some(names);
                self.error = None;
                true
            }
            Err(e) => {
                warn!(category = %ticket.category, error = %e, "category membership load failed");
                self.membership = None;
                self.error = Some(CATEGORY_LOAD_ERROR);
                false
            }
        }
    }

    pub fn membership(&self) -> Option<&HashSet<String>> {
        self.membership.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(names: &[&str]) -> Vec<NamedResource> {
        names
            .iter()
            .map(|n| NamedResource {
                name: n.to_string(),
                url: String::new(),
            })
            .collect()
    }

    fn upstream_failure() -> CommonError {
        CommonError::InvalidJson(serde_json::from_str::<serde_json::Value>("[").unwrap_err())
    }

    #[test]
    fn all_clears_membership_without_ticket() {
        let mut filter = TypeFilter::new();
        let ticket = filter.select(Category::Fire).unwrap();
        assert!(filter.complete(ticket, Ok(members(&["charmander"]))));
        assert!(filter.membership().is_some());

        assert!(filter.select(Category::All).is_none());
        assert!(filter.membership().is_none());
        assert!(!filter.is_loading());
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut filter = TypeFilter::new();
        let fire = filter.select(Category::Fire).unwrap();
        let water = filter.select(Category::Water).unwrap();

        assert!(filter.complete(water, Ok(members(&["squirtle"]))));
        assert!(!filter.complete(fire, Ok(members(&["charmander"]))));

        let names = filter.membership().unwrap();
        assert!(names.contains("squirtle"));
        assert!(!names.contains("charmander"));
    }

    #[test]
    fn stale_response_after_all_is_dropped() {
        let mut filter = TypeFilter::new();
        let fire = filter.select(Category::Fire).unwrap();
        filter.select(Category::All);
        assert!(!filter.complete(fire, Ok(members(&["charmander"]))));
        assert!(filter.membership().is_none());
        assert!(!filter.is_loading());
    }

    #[test]
    fn failure_records_error_until_next_success() {
        let mut filter = TypeFilter::new();
        let ticket = filter.select(Category::Ghost).unwrap();
        assert!(!filter.complete(ticket, Err(upstream_failure())));
        assert_eq!(filter.error(), Some(CATEGORY_LOAD_ERROR));
        assert!(filter.membership().is_none());
        assert!(!filter.is_loading());

        let ticket = filter.select(Category::Dark).unwrap();
        assert_eq!(filter.error(), Some(CATEGORY_LOAD_ERROR));
        assert!(filter.complete(ticket, Ok(members(&["umbreon"]))));
        assert_eq!(filter.error(), None);
    }
}
