use rapidfire_engine::store::DirStore;

/// Shared application state: the directory-backed game store.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: DirStore,
}

impl AppState {
    pub fn new(games_root: &str) -> Self {
        Self {
            store: DirStore::new(games_root),
        }
    }
}
