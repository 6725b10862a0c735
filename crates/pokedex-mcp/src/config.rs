use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
///
/// Every setting is optional. The theme path, when absent, keeps the preference in memory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of catalog entries requested once at startup.
    pub list_limit: usize,
    /// Maximum number of card detail requests in flight at once.
    pub preview_concurrency: usize,
    /// JSON file holding the persisted theme preference.
    pub theme_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `POKEDEX_LIST_LIMIT` (default: 1000)
    /// - `POKEDEX_PREVIEW_CONCURRENCY` (default: 8, must be > 0)
    /// - `POKEDEX_THEME_PATH` (omit to keep the theme in memory)
    pub fn from_env() -> Result<Self, AppError> {
        let list_limit = parse_var("POKEDEX_LIST_LIMIT")?.unwrap_or(1000);

        let preview_concurrency = parse_var("POKEDEX_PREVIEW_CONCURRENCY")?.unwrap_or(8);
        if preview_concurrency == 0 {
            return Err(AppError::Config(
                "POKEDEX_PREVIEW_CONCURRENCY must be greater than zero".to_string(),
            ));
        }

        let theme_path = std::env::var("POKEDEX_THEME_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            list_limit,
            preview_concurrency,
            theme_path,
        })
    }
}

fn parse_var(name: &str) -> Result<Option<usize>, AppError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{name} must be a non-negative integer, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}
