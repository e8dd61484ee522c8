use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use rapidfire_core::assets::AssetMap;
use rapidfire_core::game_trait::GameFactory;
use rapidfire_core::manifest::GameDescriptor;

use crate::assets::load_assets;
use crate::catalog::ManifestCatalog;
use crate::error::EngineError;
use crate::registry::GameRegistry;
use crate::store::GameStore;

/// A game that is fully ready to play: descriptor, factory, and loaded
/// assets. Owned by the prefetch buffer until `take_next` transfers it to
/// the round controller.
pub struct LoadedGame {
    pub descriptor: GameDescriptor,
    pub factory: GameFactory,
    pub assets: AssetMap,
}

impl fmt::Debug for LoadedGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedGame")
            .field("game", &self.descriptor.name)
            .field("assets", &self.assets.len())
            .finish()
    }
}

/// Fixed-size ready queue of loaded games, refilled asynchronously so
/// that dequeuing never waits on network I/O.
pub struct PrefetchBuffer<S: GameStore> {
    inner: Arc<Inner<S>>,
}

impl<S: GameStore> Clone for PrefetchBuffer<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    store: S,
    registry: GameRegistry,
    target: usize,
    ready: Mutex<VecDeque<LoadedGame>>,
    catalog: AsyncMutex<ManifestCatalog>,
    /// Serializes refills: a re-entrant call queues behind the running
    /// one and then sees the target already met.
    refill_gate: AsyncMutex<()>,
}

impl<S: GameStore> PrefetchBuffer<S> {
    /// Load the catalog, clamp the target to its size, and fill the
    /// ready queue.
    pub async fn initialize(
        store: S,
        registry: GameRegistry,
        target_size: usize,
        filter_name: Option<&str>,
    ) -> Result<Self, EngineError> {
        let catalog = ManifestCatalog::load(&store, filter_name).await?;
        let target = target_size.min(catalog.len());
        let buffer = Self {
            inner: Arc::new(Inner {
                store,
                registry,
                target,
                ready: Mutex::new(VecDeque::new()),
                catalog: AsyncMutex::new(catalog),
                refill_gate: AsyncMutex::new(()),
            }),
        };
        buffer.refill().await;
        Ok(buffer)
    }

    pub fn ready_len(&self) -> usize {
        self.inner.ready.lock().unwrap().len()
    }

    pub fn target(&self) -> usize {
        self.inner.target
    }

    /// Top the ready queue back up to the target size. A descriptor that
    /// fails to load is logged and skipped; the loop moves on to the next
    /// one. Returns once the target is met, the catalog is exhausted, or
    /// a full catalog's worth of descriptors failed in a row.
    pub async fn refill(&self) {
        let _gate = self.inner.refill_gate.lock().await;
        let catalog_len = self.inner.catalog.lock().await.len();
        let mut consecutive_failures = 0usize;
        while self.ready_len() < self.inner.target {
            let Some(descriptor) = self.inner.catalog.lock().await.next_shuffled() else {
                tracing::error!("no games left to queue, stopping buffer refill");
                return;
            };
            let Some(factory) = self.inner.registry.factory(&descriptor.name) else {
                tracing::error!(game = %descriptor.name, "no registered factory, skipping");
                consecutive_failures += 1;
                if consecutive_failures >= catalog_len {
                    tracing::error!("every queued game failed to load, stopping buffer refill");
                    return;
                }
                continue;
            };
            consecutive_failures = 0;
            let assets = load_assets(&self.inner.store, &descriptor).await;
            tracing::debug!(game = %descriptor.name, assets = assets.len(), "buffered game");
            self.inner.ready.lock().unwrap().push_back(LoadedGame {
                descriptor,
                factory,
                assets,
            });
        }
    }

    /// Pop the head of the ready queue and kick off an asynchronous
    /// refill without blocking the caller. An empty return means the
    /// caller should await one `refill` itself and retry once.
    pub fn take_next(&self) -> Option<LoadedGame> {
        let next = self.inner.ready.lock().unwrap().pop_front();
        let buffer = self.clone();
        tokio::spawn(async move { buffer.refill().await });
        next
    }
}
