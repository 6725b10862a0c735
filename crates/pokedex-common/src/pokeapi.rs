use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CommonError;

#[derive(Clone, Debug)]
pub struct PokeApiConfig {
    pub base_url: String,
    pub default_timeout: Duration,
    pub max_error_body_bytes: usize,
}

impl PokeApiConfig {
    /// Optional:
    /// - `POKEAPI_BASE_URL` (default: "https://pokeapi.co/api/v2")
    /// - `POKEAPI_TIMEOUT_SECS` (default: 30)
    /// - `POKEAPI_MAX_ERROR_BODY_BYTES` (default: 8192)
    pub fn from_env() -> Self {
        let base_url = std::env::var("POKEAPI_BASE_URL")
            .unwrap_or_else(|_| "https://pokeapi.co/api/v2".to_string());

        let default_timeout = std::env::var("POKEAPI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let max_error_body_bytes = std::env::var("POKEAPI_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8 * 1024);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_timeout,
            max_error_body_bytes,
        }
    }
}

/// Thin PokeAPI v2 client. Every call is a single GET; failures are terminal.
#[derive(Clone)]
pub struct PokeApiClient {
    config: PokeApiConfig,
    http: reqwest::Client,
}

impl PokeApiClient {
    pub fn new(config: PokeApiConfig) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pokedex-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &PokeApiConfig {
        &self.config
    }

    pub async fn list_entries(&self, limit: usize) -> Result<Vec<NamedResource>, CommonError> {
        let url = format!("{}/pokemon?limit={limit}", self.config.base_url);
        let page: ListResponse = self.get_json(&url).await?;
        Ok(page.results)
    }

    pub async fn list_type_members(
        &self,
        type_name: &str,
    ) -> Result<Vec<NamedResource>, CommonError> {
        let url = format!("{}/type/{type_name}", self.config.base_url);
        let response: TypeResponse = self.get_json(&url).await?;
        Ok(response.pokemon.into_iter().map(|slot| slot.pokemon).collect())
    }

    pub async fn get_detail(&self, url: &str) -> Result<PokemonDetail, CommonError> {
        self.get_json(url).await
    }

    pub async fn get_detail_by_name(&self, name: &str) -> Result<PokemonDetail, CommonError> {
        let url = format!("{}/pokemon/{name}", self.config.base_url);
        self.get_json(&url).await
    }

    pub async fn get_species(&self, url: &str) -> Result<SpeciesRecord, CommonError> {
        self.get_json(url).await
    }

    pub async fn get_evolution_chain(&self, url: &str) -> Result<EvolutionChainResponse, CommonError> {
        self.get_json(url).await
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, CommonError> {
        debug!(url, "pokeapi GET");
        let resp = self
            .http
            .get(url)
            .timeout(self.config.default_timeout)
            .send()
            .await?;
        Self::parse_json_response(resp, self.config.max_error_body_bytes).await
    }

    async fn parse_json_response<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> Result<T, CommonError> {
        let status = resp.status();
        if status.is_success() {
            let bytes = resp.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }
        let body = read_limited_text(resp, max_error_body_bytes).await;
        Err(CommonError::Upstream { status, body })
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

// --- Wire types ---

/// A `{name, url}` pair as PokeAPI uses for every cross-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// An unnamed `{url}` reference (used for evolution chains).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReference {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct TypeResponse {
    #[serde(default)]
    pokemon: Vec<TypeSlot>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    pokemon: NamedResource,
}

/// Full record for one Pokémon (`GET /pokemon/{id or name}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonDetail {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Decimetres.
    #[serde(default)]
    pub height: u32,
    /// Hectograms.
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub moves: Vec<PokemonMove>,
    pub species: NamedResource,
}

impl PokemonDetail {
    /// Official artwork, falling back to the default front sprite.
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites
            .official_artwork()
            .or(self.sprites.front_default.as_deref())
    }
}

/// Sprite URLs. Field order matches the API so the gallery renders in the same order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    pub back_default: Option<String>,
    pub back_female: Option<String>,
    pub back_shiny: Option<String>,
    pub back_shiny_female: Option<String>,
    pub front_default: Option<String>,
    pub front_female: Option<String>,
    pub front_shiny: Option<String>,
    pub front_shiny_female: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

impl Sprites {
    pub fn official_artwork(&self) -> Option<&str> {
        self.other
            .as_ref()?
            .official_artwork
            .as_ref()?
            .front_default
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    /// Every top-level sprite that holds a non-empty URL, keyed by field name.
    pub fn gallery(&self) -> Vec<(&'static str, &str)> {
        [
            ("back_default", &self.back_default),
            ("back_female", &self.back_female),
            ("back_shiny", &self.back_shiny),
            ("back_shiny_female", &self.back_shiny_female),
            ("front_default", &self.front_default),
            ("front_female", &self.front_female),
            ("front_shiny", &self.front_shiny),
            ("front_shiny_female", &self.front_shiny_female),
        ]
        .into_iter()
        .filter_map(|(key, url)| {
            url.as_deref()
                .filter(|url| !url.is_empty())
                .map(|url| (key, url))
        })
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtworkSprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonType {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub type_: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonAbility {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonMove {
    #[serde(rename = "move")]
    pub move_: NamedResource,
}

/// Descriptive species metadata (`GET /pokemon-species/{id}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    pub capture_rate: Option<u32>,
    #[serde(default)]
    pub habitat: Option<NamedResource>,
    #[serde(default)]
    pub generation: Option<NamedResource>,
    #[serde(default)]
    pub color: Option<NamedResource>,
    #[serde(default)]
    pub shape: Option<NamedResource>,
    #[serde(default)]
    pub evolution_chain: Option<ApiReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
    #[serde(default)]
    pub version: Option<NamedResource>,
}

/// `GET /evolution-chain/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionChainResponse {
    pub chain: ChainLink,
}

/// One node of the evolution tree. `evolves_to` may hold several branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}
