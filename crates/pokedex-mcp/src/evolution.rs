/// Evolution chains.
///
/// PokeAPI returns a rooted tree: a node can have several `evolves_to` successors (Eevee has
/// eight). The tree is kept whole here, but only its primary line, the path that always takes
/// the first successor, is projected into the detail view. Skipped branches are counted and
/// logged so under-represented families are visible in the logs.
use futures::future::join_all;
use pokedex_common::mcp_api::EvolutionStage;
use pokedex_common::pokeapi::ChainLink;
use pokedex_common::source::CatalogSource;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionTree {
    pub species: String,
    pub children: Vec<EvolutionTree>,
}

impl From<ChainLink> for EvolutionTree {
    fn from(link: ChainLink) -> Self {
        Self {
            species: link.species.name,
            children: link.evolves_to.into_iter().map(EvolutionTree::from).collect(),
        }
    }
}

impl EvolutionTree {
    /// Species names from the root, following the first successor at every step.
    pub fn primary_line(&self) -> Vec<&str> {
        let mut line = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current {
            line.push(node.species.as_str());
            current = node.children.first();
        }
        line
    }

    /// Number of successor branches the primary line passes over.
    pub fn skipped_branches(&self) -> usize {
        let mut skipped = 0;
        let mut current = Some(self);
        while let Some(node) = current {
            skipped += node.children.len().saturating_sub(1);
            current = node.children.first();
        }
        skipped
    }
}

/// Look up artwork for every stage of the primary line.
///
/// Lookups run concurrently; the result keeps chain order. A failed lookup keeps its stage
/// with no artwork.
pub async fn resolve_stages(source: &dyn CatalogSource, tree: &EvolutionTree) -> Vec<EvolutionStage> {
    let skipped = tree.skipped_branches();
    if skipped > 0 {
        debug!(root = %tree.species, skipped, "evolution chain branches beyond the primary line");
    }

    let line = tree.primary_line();
    let lookups = line.iter().map(|name| async move {
        let artwork_url = match source.get_detail_by_name(name).await {
            Ok(detail) => detail.artwork_url().map(str::to_string),
            Err(e) => {
                warn!(species = %name, error = %e, "failed to load evolution artwork");
                None
            }
        };
        EvolutionStage {
            name: name.to_string(),
            artwork_url,
        }
    });
    join_all(lookups).await
}
