use rapidfire_core::manifest::GameDescriptor;
use rapidfire_core::shuffle::ShuffledQueue;

use crate::error::EngineError;
use crate::store::GameStore;

/// The full set of available game descriptors, with random-order
/// iteration that reshuffles on exhaustion.
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    all: Vec<GameDescriptor>,
    queue: ShuffledQueue<GameDescriptor>,
}

impl ManifestCatalog {
    /// Fetch all descriptors, optionally restricted to one named game
    /// (single-game repeat mode). A fetch failure is fatal: nothing is
    /// playable without a catalog.
    pub async fn load<S: GameStore>(
        store: &S,
        filter_name: Option<&str>,
    ) -> Result<Self, EngineError> {
        let mut all = store
            .fetch_catalog()
            .await
            .map_err(|e| EngineError::CatalogUnavailable(e.to_string()))?;
        if let Some(name) = filter_name {
            all.retain(|d| d.name == name);
        }
        tracing::info!(games = all.len(), "loaded game catalog");
        Ok(Self {
            queue: ShuffledQueue::new(all.clone()),
            all,
        })
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn descriptors(&self) -> &[GameDescriptor] {
        &self.all
    }

    /// Pop one descriptor from the shuffled working copy, transparently
    /// reshuffling when it runs out. `None` means the catalog itself is
    /// empty — callers must stop, not spin.
    pub fn next_shuffled(&mut self) -> Option<GameDescriptor> {
        self.queue.next()
    }
}
