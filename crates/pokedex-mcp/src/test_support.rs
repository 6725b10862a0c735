//! In-memory catalog source for tests.
//!
//! Every call is recorded under a key (`list`, `type:{name}`, `detail:{url}`, `name:{name}`,
//! `species:{url}`, `chain:{url}`). A key can be gated, in which case the call waits until the
//! test releases the gate, or marked failing.
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pokedex_common::error::CommonError;
use pokedex_common::pokeapi::{
    ApiReference, ArtworkSprites, ChainLink, EvolutionChainResponse, FlavorTextEntry,
    NamedResource, OtherSprites, PokemonAbility, PokemonDetail, PokemonMove, PokemonStat,
    PokemonType, SpeciesRecord, Sprites,
};
use pokedex_common::source::CatalogSource;
use reqwest::StatusCode;
use tokio::sync::Notify;

#[derive(Default)]
pub struct FakeSource {
    entries: Vec<NamedResource>,
    types: HashMap<String, Vec<String>>,
    details: HashMap<String, PokemonDetail>,
    chains: HashMap<String, EvolutionChainResponse>,
    failing: HashSet<String>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
    call_made: Notify,
}

fn resource(name: &str, url: String) -> NamedResource {
    NamedResource {
        name: name.to_string(),
        url,
    }
}

impl FakeSource {
    pub fn detail_url(name: &str) -> String {
        format!("https://pokeapi.test/pokemon/{name}/")
    }

    pub fn species_url(name: &str) -> String {
        format!("https://pokeapi.test/pokemon-species/{name}/")
    }

    pub fn chain_url(name: &str) -> String {
        format!("https://pokeapi.test/evolution-chain/{name}/")
    }

    /// A catalog of `names`, each with a detail record (typed "normal") and species record.
    pub fn with_catalog(names: &[&str]) -> Self {
        let mut source = Self::default();
        for name in names {
            source.entries.push(resource(name, Self::detail_url(name)));
            source
                .details
                .insert(name.to_string(), Self::detail(name, &["normal"]));
        }
        source
    }

    /// A catalog of `p1..=pN`.
    pub fn numbered(count: usize) -> Self {
        let names: Vec<String> = (1..=count).map(|i| format!("p{i}")).collect();
        Self::with_catalog(&names.iter().map(String::as_str).collect::<Vec<_>>())
    }

    pub fn with_type(mut self, type_name: &str, members: &[&str]) -> Self {
        self.types.insert(
            type_name.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    /// Register a linear evolution line at `root`'s chain URL.
    pub fn with_chain(mut self, root: &str, line: &[&str]) -> Self {
        let chain = line.iter().rev().fold(None::<ChainLink>, |next, name| {
            Some(ChainLink {
                species: resource(name, Self::species_url(name)),
                evolves_to: next.into_iter().collect(),
            })
        });
        if let Some(chain) = chain {
            self.chains
                .insert(Self::chain_url(root), EvolutionChainResponse { chain });
        }
        self
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Hold calls for `key` until the returned gate is notified.
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == key).count()
    }

    /// Wait until `key` has been called at least once.
    pub async fn wait_for_call(&self, key: &str) {
        loop {
            let notified = self.call_made.notified();
            if self.call_count(key) > 0 {
                return;
            }
            notified.await;
        }
    }

    pub fn detail(name: &str, types: &[&str]) -> PokemonDetail {
        PokemonDetail {
            id: 0,
            name: name.to_string(),
            base_experience: Some(64),
            height: 7,
            weight: 69,
            sprites: Sprites {
                back_default: Some(format!("https://img.test/{name}-back.png")),
                front_default: Some(format!("https://img.test/{name}-front.png")),
                other: Some(OtherSprites {
                    official_artwork: Some(ArtworkSprites {
                        front_default: Some(format!("https://img.test/{name}.png")),
                        front_shiny: None,
                    }),
                }),
                ..Sprites::default()
            },
            types: types
                .iter()
                .enumerate()
                .map(|(i, t)| PokemonType {
                    slot: (i + 1) as u8,
                    type_: resource(t, String::new()),
                })
                .collect(),
            stats: vec![
                PokemonStat {
                    base_stat: 45,
                    effort: 0,
                    stat: resource("hp", String::new()),
                },
                PokemonStat {
                    base_stat: 49,
                    effort: 0,
                    stat: resource("attack", String::new()),
                },
            ],
            abilities: vec![
                PokemonAbility {
                    ability: resource(&format!("{name}-ability"), String::new()),
                    is_hidden: false,
                    slot: 1,
                },
                PokemonAbility {
                    ability: resource(&format!("{name}-hidden"), String::new()),
                    is_hidden: true,
                    slot: 3,
                },
            ],
            moves: (1..=12)
                .map(|i| PokemonMove {
                    move_: resource(&format!("move-{i}"), String::new()),
                })
                .collect(),
            species: resource(name, Self::species_url(name)),
        }
    }

    fn species(name: &str) -> SpeciesRecord {
        SpeciesRecord {
            name: name.to_string(),
            flavor_text_entries: vec![
                FlavorTextEntry {
                    flavor_text: format!("{name} texte"),
                    language: resource("fr", String::new()),
                    version: None,
                },
                FlavorTextEntry {
                    flavor_text: format!("{name} flavor\u{000C}text"),
                    language: resource("en", String::new()),
                    version: None,
                },
            ],
            capture_rate: Some(45),
            habitat: Some(resource("grassland", String::new())),
            generation: Some(resource("generation-i", String::new())),
            color: Some(resource("green", String::new())),
            shape: Some(resource("quadruped", String::new())),
            evolution_chain: Some(ApiReference {
                url: Self::chain_url(name),
            }),
        }
    }

    async fn record(&self, key: String) -> Result<(), CommonError> {
        self.calls.lock().unwrap().push(key.clone());
        self.call_made.notify_waiters();
        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.contains(&key) {
            return Err(not_found(&key));
        }
        Ok(())
    }

    fn name_from_url<'a>(&self, url: &'a str, prefix: &str) -> Option<&'a str> {
        url.strip_prefix(prefix)?.strip_suffix('/')
    }
}

fn not_found(key: &str) -> CommonError {
    CommonError::Upstream {
        status: StatusCode::NOT_FOUND,
        body: format!("no fixture for {key}"),
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn list_entries(&self, limit: usize) -> Result<Vec<NamedResource>, CommonError> {
        self.record("list".to_string()).await?;
        Ok(self.entries.iter().take(limit).cloned().collect())
    }

    async fn list_category_members(
        &self,
        category: &str,
    ) -> Result<Vec<NamedResource>, CommonError> {
        let key = format!("type:{category}");
        self.record(key.clone()).await?;
        let members = self.types.get(category).ok_or_else(|| not_found(&key))?;
        Ok(members
            .iter()
            .map(|m| resource(m, Self::detail_url(m)))
            .collect())
    }

    async fn get_detail(&self, url: &str) -> Result<PokemonDetail, CommonError> {
        let key = format!("detail:{url}");
        self.record(key.clone()).await?;
        self.name_from_url(url, "https://pokeapi.test/pokemon/")
            .and_then(|name| self.details.get(name))
            .cloned()
            .ok_or_else(|| not_found(&key))
    }

    async fn get_detail_by_name(&self, name: &str) -> Result<PokemonDetail, CommonError> {
        let key = format!("name:{name}");
        self.record(key.clone()).await?;
        self.details.get(name).cloned().ok_or_else(|| not_found(&key))
    }

    async fn get_species(&self, url: &str) -> Result<SpeciesRecord, CommonError> {
        let key = format!("species:{url}");
        self.record(key.clone()).await?;
        self.name_from_url(url, "https://pokeapi.test/pokemon-species/")
            .filter(|name| self.details.contains_key(*name))
            .map(Self::species)
            .ok_or_else(|| not_found(&key))
    }

    async fn get_evolution_chain(
        &self,
        url: &str,
    ) -> Result<EvolutionChainResponse, CommonError> {
        let key = format!("chain:{url}");
        self.record(key.clone()).await?;
        self.chains.get(url).cloned().ok_or_else(|| not_found(&key))
    }
}
