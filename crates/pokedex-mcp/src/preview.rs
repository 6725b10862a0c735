/// Per-card detail loading.
///
/// Each card mounted on the current page holds a reference on a slot keyed by its detail URL.
/// The first reference spawns the fetch; later references (re-renders, the detail view) share
/// the same in-flight future instead of issuing another request. When the last reference is
/// released the slot is dropped and an unfinished fetch is aborted. A semaphore bounds how
/// many fetches run at once.
///
/// Failures are logged and cached in the slot: the card stays a loading placeholder until it
/// is unmounted.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use pokedex_common::mcp_api::{CardPreview, TypeBadge};
use pokedex_common::pokeapi::PokemonDetail;
use pokedex_common::source::CatalogSource;
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::model::type_color;

type FetchOutput = Result<Arc<PokemonDetail>, String>;

struct Slot {
    refs: usize,
    fetch: Shared<BoxFuture<'static, FetchOutput>>,
    abort: AbortHandle,
}

pub struct PreviewLoader {
    source: Arc<dyn CatalogSource>,
    permits: Arc<Semaphore>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl PreviewLoader {
    pub fn new(source: Arc<dyn CatalogSource>, concurrency: usize) -> Self {
        Self {
            source,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Mount a card for `url`. Must run inside a tokio runtime.
    pub fn acquire(&self, url: &str) {
        let mut slots = self.slots();
        if let Some(slot) = slots.get_mut(url) {
            slot.refs += 1;
            return;
        }

        let source = Arc::clone(&self.source);
        let permits = Arc::clone(&self.permits);
        let owned_url = url.to_string();
        let task = tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| format!("preview queue closed: {e}"))?;
            source
                .get_detail(&owned_url)
                .await
                .map(Arc::new)
                .inspect_err(|e| warn!(url = %owned_url, error = %e, "failed to load card detail"))
                .map_err(|e| e.to_string())
        });
        let abort = task.abort_handle();
        let fetch = task
            .map(|joined| joined.unwrap_or_else(|e| Err(format!("card fetch task ended: {e}"))))
            .boxed()
            .shared();

        debug!(url, "card mounted, fetching detail");
        slots.insert(url.to_string(), Slot { refs: 1, fetch, abort });
    }

    /// Unmount a card for `url`; the slot goes away with its last reference.
    pub fn release(&self, url: &str) {
        let mut slots = self.slots();
        let Some(slot) = slots.get_mut(url) else {
            return;
        };
        slot.refs -= 1;
        if slot.refs == 0 {
            if let Some(slot) = slots.remove(url) {
                slot.abort.abort();
                debug!(url, "card unmounted");
            }
        }
    }

    /// The detail record behind `url`. Mounted URLs share the slot's fetch; anything else is
    /// fetched directly without being cached.
    pub async fn get(&self, url: &str) -> Result<Arc<PokemonDetail>, AppError> {
        let shared = self.slots().get(url).map(|slot| slot.fetch.clone());
        match shared {
            Some(fetch) => fetch.await.map_err(AppError::Fetch),
            None => Ok(Arc::new(self.source.get_detail(url).await?)),
        }
    }

    /// The finished record for a mounted URL, without waiting.
    #[cfg(test)]
    pub fn peek(&self, url: &str) -> Option<Arc<PokemonDetail>> {
        self.slots()
            .get(url)
            .and_then(|slot| slot.fetch.peek().cloned())
            .and_then(Result::ok)
    }

    /// Number of distinct URLs currently mounted.
    pub fn mounted(&self) -> usize {
        self.slots().len()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Artwork plus type badges, the part of a detail record a card renders.
pub fn card_preview(detail: &PokemonDetail) -> CardPreview {
    CardPreview {
        name: detail.name.clone(),
        artwork_url: detail.artwork_url().map(str::to_string),
        types: type_badges(detail),
    }
}

pub fn type_badges(detail: &PokemonDetail) -> Vec<TypeBadge> {
    detail
        .types
        .iter()
        .map(|t| TypeBadge {
            name: t.type_.name.clone(),
            color: type_color(&t.type_.name).to_string(),
        })
        .collect()
}
