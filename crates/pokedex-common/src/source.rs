/// The read-only catalog data provider consumed by the Pokédex.
///
/// `PokeApiClient` is the production implementation; tests substitute an in-memory source.
use async_trait::async_trait;

use crate::error::CommonError;
use crate::pokeapi::{
    EvolutionChainResponse, NamedResource, PokeApiClient, PokemonDetail, SpeciesRecord,
};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Up to `limit` catalog entries, in API order.
    async fn list_entries(&self, limit: usize) -> Result<Vec<NamedResource>, CommonError>;
    /// Every Pokémon belonging to one type.
    async fn list_category_members(&self, category: &str)
        -> Result<Vec<NamedResource>, CommonError>;
    /// Full record behind a detail URL.
    async fn get_detail(&self, url: &str) -> Result<PokemonDetail, CommonError>;
    /// Full record looked up by species name.
    async fn get_detail_by_name(&self, name: &str) -> Result<PokemonDetail, CommonError>;
    async fn get_species(&self, url: &str) -> Result<SpeciesRecord, CommonError>;
    async fn get_evolution_chain(&self, url: &str)
        -> Result<EvolutionChainResponse, CommonError>;
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn list_entries(&self, limit: usize) -> Result<Vec<NamedResource>, CommonError> {
        PokeApiClient::list_entries(self, limit).await
    }

    async fn list_category_members(
        &self,
        category: &str,
    ) -> Result<Vec<NamedResource>, CommonError> {
        self.list_type_members(category).await
    }

    async fn get_detail(&self, url: &str) -> Result<PokemonDetail, CommonError> {
        PokeApiClient::get_detail(self, url).await
    }

    async fn get_detail_by_name(&self, name: &str) -> Result<PokemonDetail, CommonError> {
        PokeApiClient::get_detail_by_name(self, name).await
    }

    async fn get_species(&self, url: &str) -> Result<SpeciesRecord, CommonError> {
        PokeApiClient::get_species(self, url).await
    }

    async fn get_evolution_chain(
        &self,
        url: &str,
    ) -> Result<EvolutionChainResponse, CommonError> {
        PokeApiClient::get_evolution_chain(self, url).await
    }
}
