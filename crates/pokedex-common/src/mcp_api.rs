use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::theme::Theme;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Free text matched as a case-insensitive substring of Pokémon names. Empty clears the search.
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FilterByTypeParams {
    /// "all" or one of the 18 type names, e.g. "fire", "water", "fairy".
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GoToPageParams {
    /// 1-based page number; clamped to the available pages.
    pub page: usize,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OpenDetailParams {
    /// Pokémon name as listed in the catalog, e.g. "bulbasaur".
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TypeBadge {
    pub name: String,
    /// Hex badge colour such as "#EE8130".
    pub color: String,
}

/// Lightweight card rendering: artwork plus type badges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CardPreview {
    pub name: String,
    pub artwork_url: Option<String>,
    pub types: Vec<TypeBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CardResponse {
    pub name: String,
    pub detail_url: String,
    /// `None` while the card's detail record is loading (or failed to load).
    pub preview: Option<CardPreview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageResponse {
    pub search: String,
    pub category: String,
    pub page: usize,
    pub total_pages: usize,
    /// Number of entries passing the active filters, across all pages.
    pub found: usize,
    /// True while the list or a type filter is loading; `cards` is empty meanwhile.
    pub loading: bool,
    pub error: Option<String>,
    pub cards: Vec<CardResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvolutionStage {
    pub name: String,
    pub artwork_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteImage {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatLine {
    pub name: String,
    pub value: u32,
    /// Bar fill, `min(100, value)`.
    pub bar_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AbilityLine {
    pub name: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokedexInfo {
    pub base_experience: Option<u32>,
    pub capture_rate: Option<u32>,
    pub habitat: String,
    pub generation: Option<String>,
    pub shape: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailResponse {
    pub name: String,
    pub artwork_url: Option<String>,
    pub flavor_text: String,
    /// Primary evolution line, root first. Empty until the chain has loaded.
    pub evolution: Vec<EvolutionStage>,
    pub sprites: Vec<SpriteImage>,
    pub types: Vec<TypeBadge>,
    pub stats: Vec<StatLine>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub abilities: Vec<AbilityLine>,
    pub info: PokedexInfo,
    /// First ten moves.
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ThemeResponse {
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OkResponse {
    pub ok: bool,
}
