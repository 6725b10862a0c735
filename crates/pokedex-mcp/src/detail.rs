/// Detail view loading and composition.
///
/// Opening a view assigns it a token. Species metadata and the evolution chain are fetched
/// after the view opens; each result is written only if the view's token is still the open
/// one, so nothing lands after the view was closed or replaced. Species and evolution
/// failures are logged and the corresponding sections are left out.
use std::sync::{Arc, Mutex, MutexGuard};

use pokedex_common::mcp_api::{
    AbilityLine, DetailResponse, EvolutionStage, PokedexInfo, SpriteImage, StatLine,
};
use pokedex_common::pokeapi::{FlavorTextEntry, NamedResource, PokemonDetail, SpeciesRecord};
use pokedex_common::source::CatalogSource;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::evolution::{resolve_stages, EvolutionTree};
use crate::preview::type_badges;

pub const FLAVOR_LOCALE: &str = "en";
pub const FLAVOR_PLACEHOLDER: &str = "No description available.";
const UNKNOWN_HABITAT: &str = "Unknown";
const MOVES_SHOWN: usize = 10;

struct OpenView {
    token: u64,
    detail: Arc<PokemonDetail>,
    species: Option<SpeciesRecord>,
    evolution: Vec<EvolutionStage>,
}

#[derive(Default)]
struct ViewState {
    last_token: u64,
    open: Option<OpenView>,
}

pub struct DetailLoader {
    source: Arc<dyn CatalogSource>,
    state: Mutex<ViewState>,
}

impl DetailLoader {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            state: Mutex::new(ViewState::default()),
        }
    }

    /// Open a view for an already-fetched record, replacing any open view, then load its
    /// species and evolution line.
    ///
    /// Returns the composed view, or [`AppError::ViewClosed`] if the view was closed or
    /// replaced before loading finished.
    pub async fn open_detail(&self, detail: Arc<PokemonDetail>) -> Result<DetailResponse, AppError> {
        let token = self.begin(Arc::clone(&detail));
        info!(name = %detail.name, token, "detail view opened");

        if let Some(species) = self.load_species(&detail).await {
            let chain_url = species.evolution_chain.as_ref().map(|r| r.url.clone());
            if !self.write(token, |view| view.species = Some(species)) {
                return Err(AppError::ViewClosed);
            }
            if let Some(chain_url) = chain_url {
                if let Some(stages) = self.load_evolution(&chain_url).await {
                    if !self.write(token, |view| view.evolution = stages) {
                        return Err(AppError::ViewClosed);
                    }
                }
            }
        }

        self.snapshot(token).ok_or(AppError::ViewClosed)
    }

    /// Close the open view. Returns `false` if none was open.
    pub fn close_detail(&self) -> bool {
        let mut state = self.state();
        state.last_token += 1;
        let closed = state.open.take();
        if let Some(view) = &closed {
            info!(name = %view.detail.name, token = view.token, "detail view closed");
        }
        closed.is_some()
    }

    /// The open view as currently loaded.
    #[cfg(test)]
    pub fn current(&self) -> Option<DetailResponse> {
        let state = self.state();
        state.open.as_ref().map(compose_view)
    }

    fn begin(&self, detail: Arc<PokemonDetail>) -> u64 {
        let mut state = self.state();
        state.last_token += 1;
        let token = state.last_token;
        state.open = Some(OpenView {
            token,
            detail,
            species: None,
            evolution: Vec::new(),
        });
        token
    }

    fn write(&self, token: u64, apply: impl FnOnce(&mut OpenView)) -> bool {
        let mut state = self.state();
        match state.open.as_mut().filter(|view| view.token == token) {
            Some(view) => {
                apply(view);
                true
            }
            None => {
                debug!(token, "discarding result for a closed detail view");
                false
            }
        }
    }

    fn snapshot(&self, token: u64) -> Option<DetailResponse> {
        let state = self.state();
        state
            .open
            .as_ref()
            .filter(|view| view.token == token)
            .map(compose_view)
    }

    async fn load_species(&self, detail: &PokemonDetail) -> Option<SpeciesRecord> {
        let url = detail.species.url.as_str();
        if url.is_empty() {
            debug!(name = %detail.name, "detail record has no species reference");
            return None;
        }
        self.source
            .get_species(url)
            .await
            .inspect_err(|e| warn!(name = %detail.name, error = %e, "failed to load species"))
            .ok()
    }

    async fn load_evolution(&self, chain_url: &str) -> Option<Vec<EvolutionStage>> {
        let chain = self
            .source
            .get_evolution_chain(chain_url)
            .await
            .inspect_err(|e| warn!(url = chain_url, error = %e, "failed to load evolution chain"))
            .ok()?;
        let tree = EvolutionTree::from(chain.chain);
        Some(resolve_stages(self.source.as_ref(), &tree).await)
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// First flavor text in [`FLAVOR_LOCALE`], with form feeds turned into spaces.
pub fn select_flavor_text(entries: &[FlavorTextEntry]) -> Option<String> {
    entries
        .iter()
        .find(|e| e.language.name == FLAVOR_LOCALE)
        .map(|e| e.flavor_text.replace('\u{000C}', " "))
}

fn resource_name(resource: &Option<NamedResource>) -> Option<String> {
    resource.as_ref().map(|r| r.name.clone())
}

fn compose_view(view: &OpenView) -> DetailResponse {
    compose_detail(&view.detail, view.species.as_ref(), &view.evolution)
}

pub fn compose_detail(
    detail: &PokemonDetail,
    species: Option<&SpeciesRecord>,
    evolution: &[EvolutionStage],
) -> DetailResponse {
    let flavor_text = species
        .and_then(|s| select_flavor_text(&s.flavor_text_entries))
        .unwrap_or_else(|| FLAVOR_PLACEHOLDER.to_string());

    DetailResponse {
        name: detail.name.clone(),
        artwork_url: detail.artwork_url().map(str::to_string),
        flavor_text,
        evolution: evolution.to_vec(),
        sprites: detail
            .sprites
            .gallery()
            .into_iter()
            .map(|(key, url)| SpriteImage {
                key: key.to_string(),
                url: url.to_string(),
            })
            .collect(),
        types: type_badges(detail),
        stats: detail
            .stats
            .iter()
            .map(|s| StatLine {
                name: s.stat.name.clone(),
                value: s.base_stat,
                bar_percent: s.base_stat.min(100),
            })
            .collect(),
        height_m: f64::from(detail.height) / 10.0,
        weight_kg: f64::from(detail.weight) / 10.0,
        abilities: detail
            .abilities
            .iter()
            .map(|a| AbilityLine {
                name: a.ability.name.clone(),
                hidden: a.is_hidden,
            })
            .collect(),
        info: PokedexInfo {
            base_experience: detail.base_experience,
            capture_rate: species.and_then(|s| s.capture_rate),
            habitat: species
                .and_then(|s| resource_name(&s.habitat))
                .unwrap_or_else(|| UNKNOWN_HABITAT.to_string()),
            generation: species.and_then(|s| resource_name(&s.generation)),
            shape: species.and_then(|s| resource_name(&s.shape)),
            color: species.and_then(|s| resource_name(&s.color)),
        },
        moves: detail
            .moves
            .iter()
            .take(MOVES_SHOWN)
            .map(|m| m.move_.name.clone())
            .collect(),
    }
}
