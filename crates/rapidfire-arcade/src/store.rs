use rapidfire_core::manifest::GameDescriptor;
use rapidfire_engine::error::StoreError;
use rapidfire_engine::store::{DirStore, GameStore, HttpStore};

use crate::config::{StoreConfig, StoreMode};

/// Runtime-selected game store: local directory or catalog server.
pub enum ArcadeStore {
    Dir(DirStore),
    Http(HttpStore),
}

impl ArcadeStore {
    pub fn from_config(config: &StoreConfig) -> Self {
        match config.mode {
            StoreMode::Dir => {
                tracing::info!(root = %config.games_root, "serving games from local directory");
                Self::Dir(DirStore::new(&config.games_root))
            },
            StoreMode::Http => {
                tracing::info!(base = %config.base_url, "fetching games from catalog server");
                Self::Http(HttpStore::new(config.base_url.clone()))
            },
        }
    }
}

impl GameStore for ArcadeStore {
    async fn fetch_catalog(&self) -> Result<Vec<GameDescriptor>, StoreError> {
        match self {
            Self::Dir(store) => store.fetch_catalog().await,
            Self::Http(store) => store.fetch_catalog().await,
        }
    }

    async fn fetch_asset(&self, game: &str, filename: &str) -> Result<Vec<u8>, StoreError> {
        match self {
            Self::Dir(store) => store.fetch_asset(game, filename).await,
            Self::Http(store) => store.fetch_asset(game, filename).await,
        }
    }
}
