/// Session state for one Pokédex client.
///
/// Holds the catalog list, the type filter and the query, and keeps the set of mounted cards
/// in step with the page being rendered. Every read goes through [`derive_view`], so the
/// stored page is re-clamped whenever the result set shrinks.
use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use pokedex_common::mcp_api::{CardResponse, DetailResponse, PageResponse};
use pokedex_common::pokeapi::PokemonDetail;
use pokedex_common::source::CatalogSource;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::catalog::ListCache;
use crate::config::Config;
use crate::detail::DetailLoader;
use crate::error::AppError;
use crate::membership::TypeFilter;
use crate::model::{CatalogEntry, Category, QueryState};
use crate::preview::{card_preview, PreviewLoader};
use crate::query::derive_view;

struct PokedexState {
    list: ListCache,
    filter: TypeFilter,
    query: QueryState,
    /// Detail URLs of the cards on the last rendered page.
    mounted: Vec<String>,
}

pub struct Pokedex {
    source: Arc<dyn CatalogSource>,
    list_limit: usize,
    state: RwLock<PokedexState>,
    previews: PreviewLoader,
    details: DetailLoader,
}

impl Pokedex {
    pub fn new(source: Arc<dyn CatalogSource>, config: &Config) -> Self {
        Self {
            previews: PreviewLoader::new(Arc::clone(&source), config.preview_concurrency),
            details: DetailLoader::new(Arc::clone(&source)),
            source,
            list_limit: config.list_limit,
            state: RwLock::new(PokedexState {
                list: ListCache::new(),
                filter: TypeFilter::new(),
                query: QueryState::default(),
                mounted: Vec::new(),
            }),
        }
    }

    /// Fetch the catalog list. Only the first call issues a request.
    pub async fn initialize(&self) {
        if !self.state.write().await.list.begin() {
            debug!("catalog list already requested");
            return;
        }
        let result = self.source.list_entries(self.list_limit).await;
        self.state.write().await.list.complete(result);
    }

    pub async fn set_search_text(&self, text: &str) {
        let mut state = self.state.write().await;
        state.query.search_text = text.to_string();
        state.query.page = 1;
    }

    /// Select a category and wait for its membership. A response that arrives after a later
    /// selection leaves state untouched.
    pub async fn set_category(&self, category: Category) {
        let ticket = {
            let mut state = self.state.write().await;
            state.query.category = category;
            state.query.page = 1;
            state.filter.select(category)
        };
        let Some(ticket) = ticket else {
            info!("category filter cleared");
            return;
        };

        let result = self
            .source
            .list_category_members(ticket.category().as_str())
            .await;
        let mut state = self.state.write().await;
        if state.filter.complete(ticket, result) {
            state.query.page = 1;
        }
    }

    pub async fn next_page(&self) {
        self.move_page(|page, total| (page + 1).min(total)).await;
    }

    pub async fn prev_page(&self) {
        self.move_page(|page, _| page.saturating_sub(1).max(1)).await;
    }

    pub async fn go_to_page(&self, page: usize) {
        self.move_page(|_, total| page.clamp(1, total)).await;
    }

    async fn move_page(&self, next: impl FnOnce(usize, usize) -> usize) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let view = derive_view(state.list.entries(), state.filter.membership(), &state.query);
        let page = next(view.page, view.total_pages);
        state.query.page = page;
    }

    /// The current page with a preview for each card.
    ///
    /// Cards leaving the page release their preview slot and cards entering it acquire one.
    /// Nothing is mounted while the list or a type filter is loading. A card whose detail
    /// failed to load renders without a preview.
    pub async fn render(&self) -> PageResponse {
        let (mut response, visible) = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;

            let loading = state.list.is_loading() || state.filter.is_loading();
            let error = state.list.error().or(state.filter.error());
            let view = derive_view(state.list.entries(), state.filter.membership(), &state.query);
            let visible: Vec<CatalogEntry> = if loading {
                Vec::new()
            } else {
                view.entries.into_iter().cloned().collect()
            };

            let response = PageResponse {
                search: state.query.search_text.clone(),
                category: state.query.category.to_string(),
                page: view.page,
                total_pages: view.total_pages,
                found: view.found,
                loading,
                error: error.map(str::to_string),
                cards: Vec::new(),
            };
            state.query.page = view.page;
            self.remount(&mut state.mounted, &visible);
            (response, visible)
        };

        let previews = join_all(visible.iter().map(|e| self.previews.get(&e.detail_url))).await;
        response.cards = visible
            .into_iter()
            .zip(previews)
            .map(|(entry, preview)| CardResponse {
                preview: preview.ok().map(|detail| card_preview(&detail)),
                name: entry.name,
                detail_url: entry.detail_url,
            })
            .collect();
        response
    }

    fn remount(&self, mounted: &mut Vec<String>, visible: &[CatalogEntry]) {
        let next: Vec<String> = visible.iter().map(|e| e.detail_url.clone()).collect();
        let previous: HashSet<&str> = mounted.iter().map(String::as_str).collect();
        let current: HashSet<&str> = next.iter().map(String::as_str).collect();

        for url in next.iter().filter(|url| !previous.contains(url.as_str())) {
            self.previews.acquire(url);
        }
        for url in mounted.iter().filter(|url| !current.contains(url.as_str())) {
            self.previews.release(url);
        }
        *mounted = next;
        debug!(cards = mounted.len(), slots = self.previews.mounted(), "page cards mounted");
    }

    /// The full detail record for a catalog entry, sharing the card's fetch if it is mounted.
    pub async fn load_detail(&self, name: &str) -> Result<Arc<PokemonDetail>, AppError> {
        let url = {
            let state = self.state.read().await;
            state.list.find(name).map(|e| e.detail_url.clone())
        };
        let url = url.ok_or_else(|| AppError::NotFound(name.trim().to_string()))?;
        self.previews.get(&url).await
    }

    pub async fn open_detail(&self, name: &str) -> Result<DetailResponse, AppError> {
        let detail = self.load_detail(name).await?;
        self.details.open_detail(detail).await
    }

    pub fn close_detail(&self) -> bool {
        self.details.close_detail()
    }
}
