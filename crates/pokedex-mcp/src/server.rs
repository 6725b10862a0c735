/// MCP server implementation for the Pokédex.
///
/// Exposes the catalog as a paged grid plus a detail view:
/// - `browse`, `search`, `filter_by_type`: render the current page under the active query
/// - `next_page`, `prev_page`, `go_to_page`: move through the result pages
/// - `open_detail`, `close_detail`: the full detail view for one Pokémon
/// - `get_theme`, `toggle_theme`: the persisted light/dark preference
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};

use crate::model::Category;
use crate::pokedex::Pokedex;
use pokedex_common::mcp_api::{
    DetailResponse, FilterByTypeParams, GoToPageParams, OkResponse, OpenDetailParams,
    PageResponse, SearchParams, ThemeResponse,
};
use pokedex_common::theme::ThemeStore;

#[derive(Clone)]
pub struct PokedexServer {
    pokedex: Arc<Pokedex>,
    themes: Arc<ThemeStore>,
    tool_router: ToolRouter<PokedexServer>,
}

impl PokedexServer {
    pub fn new(pokedex: Arc<Pokedex>, themes: Arc<ThemeStore>) -> Self {
        Self {
            pokedex,
            themes,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PokedexServer {
    #[tool(description = "Show the current page of the Pokédex grid: 24 cards with artwork and type badges, plus the active search, type filter, page count and any error banner.")]
    async fn browse(&self) -> Result<Json<PageResponse>, String> {
        Ok(Json(self.pokedex.render().await))
    }

    #[tool(description = "Search Pokémon by name (case-insensitive substring). Resets to page 1. An empty text clears the search.")]
    async fn search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<Json<PageResponse>, String> {
        self.pokedex.set_search_text(&params.text).await;
        Ok(Json(self.pokedex.render().await))
    }

    #[tool(description = "Filter the grid by Pokémon type ('fire', 'water', 'dragon', ...) or 'all' to clear the filter. Resets to page 1.")]
    async fn filter_by_type(
        &self,
        Parameters(params): Parameters<FilterByTypeParams>,
    ) -> Result<Json<PageResponse>, String> {
        let category: Category = params.category.parse().map_err(|e| {
            let available: Vec<&str> = Category::OPTIONS.iter().map(|c| c.as_str()).collect();
            format!("{e}. Available categories: {}", available.join(", "))
        })?;
        self.pokedex.set_category(category).await;
        Ok(Json(self.pokedex.render().await))
    }

    #[tool(description = "Go to the next page of results. Stays on the last page.")]
    async fn next_page(&self) -> Result<Json<PageResponse>, String> {
        self.pokedex.next_page().await;
        Ok(Json(self.pokedex.render().await))
    }

    #[tool(description = "Go to the previous page of results. Stays on page 1.")]
    async fn prev_page(&self) -> Result<Json<PageResponse>, String> {
        self.pokedex.prev_page().await;
        Ok(Json(self.pokedex.render().await))
    }

    #[tool(description = "Jump to a 1-based page number; out-of-range pages are clamped.")]
    async fn go_to_page(
        &self,
        Parameters(params): Parameters<GoToPageParams>,
    ) -> Result<Json<PageResponse>, String> {
        self.pokedex.go_to_page(params.page).await;
        Ok(Json(self.pokedex.render().await))
    }

    #[tool(description = "Open the detail view for a Pokémon by name: artwork, flavor text, evolution line, sprites, stats, abilities, Pokédex data and first ten moves.")]
    async fn open_detail(
        &self,
        Parameters(params): Parameters<OpenDetailParams>,
    ) -> Result<Json<DetailResponse>, String> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err("name must not be empty".to_string());
        }
        self.pokedex
            .open_detail(&name)
            .await
            .map(Json)
            .map_err(|e| format!("open_detail failed: {e}"))
    }

    #[tool(description = "Close the open detail view. Reports whether a view was open.")]
    async fn close_detail(&self) -> Result<Json<OkResponse>, String> {
        Ok(Json(OkResponse {
            ok: self.pokedex.close_detail(),
        }))
    }

    #[tool(description = "Get the current colour theme ('light' or 'dark').")]
    async fn get_theme(&self) -> Result<Json<ThemeResponse>, String> {
        Ok(Json(ThemeResponse {
            theme: self.themes.current(),
        }))
    }

    #[tool(description = "Switch between the light and dark theme. The choice is persisted across sessions.")]
    async fn toggle_theme(&self) -> Result<Json<ThemeResponse>, String> {
        let theme = self
            .themes
            .toggle()
            .map_err(|e| format!("toggle_theme failed: {e}"))?;
        Ok(Json(ThemeResponse { theme }))
    }
}

#[tool_handler]
impl ServerHandler for PokedexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "pokedex".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Pokédex MCP server backed by PokeAPI. Use browse to see the current \
                 page, search and filter_by_type to narrow the catalog, next_page, \
                 prev_page and go_to_page to move through results, open_detail for \
                 one Pokémon's full entry, and get_theme/toggle_theme for the \
                 display preference."
                    .to_string(),
            ),
        }
    }
}
