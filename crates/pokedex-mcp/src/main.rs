mod catalog;
mod config;
mod detail;
mod error;
mod evolution;
mod membership;
mod model;
mod pokedex;
mod preview;
mod query;
mod server;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use pokedex::Pokedex;
use pokedex_common::pokeapi::{PokeApiClient, PokeApiConfig};
use pokedex_common::source::CatalogSource;
use pokedex_common::theme::ThemeStore;
use server::PokedexServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting pokedex MCP server");

    let config = Config::from_env()?;
    let api_config = PokeApiConfig::from_env();
    info!(
        base_url = %api_config.base_url,
        list_limit = config.list_limit,
        preview_concurrency = config.preview_concurrency,
        theme_path = ?config.theme_path,
        "configuration loaded"
    );

    let source: Arc<dyn CatalogSource> = Arc::new(PokeApiClient::new(api_config)?);
    let themes = Arc::new(ThemeStore::load(config.theme_path.clone()));
    info!(theme = ?themes.current(), "theme preference loaded");

    let pokedex = Arc::new(Pokedex::new(source, &config));
    pokedex.initialize().await;

    let server = PokedexServer::new(pokedex, themes);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
