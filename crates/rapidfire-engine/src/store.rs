use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use rapidfire_core::manifest::{GameDescriptor, ManifestFile};

use crate::error::StoreError;

/// Backing store for the catalog and per-game static assets. Assets live
/// under a path namespaced by the game's name.
pub trait GameStore: Send + Sync + 'static {
    /// Fetch every game descriptor the store knows about.
    fn fetch_catalog(
        &self,
    ) -> impl Future<Output = Result<Vec<GameDescriptor>, StoreError>> + Send;

    /// Fetch the raw bytes of one declared asset of one game.
    fn fetch_asset(
        &self,
        game: &str,
        filename: &str,
    ) -> impl Future<Output = Result<Vec<u8>, StoreError>> + Send;
}

/// Store backed by a local games directory: one subdirectory per game,
/// each with a `manifest.json` and an `assets/` folder. Directories with
/// a missing or unparseable manifest are skipped, not fatal.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl GameStore for DirStore {
    async fn fetch_catalog(&self) -> Result<Vec<GameDescriptor>, StoreError> {
        let mut descriptors = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let manifest_path = entry.path().join("manifest.json");
            let raw = match tokio::fs::read(&manifest_path).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(game = %name, error = %e, "no readable manifest, skipping");
                    continue;
                },
            };
            match serde_json::from_slice::<ManifestFile>(&raw) {
                Ok(manifest) => descriptors.push(manifest.into_descriptor(name)),
                Err(e) => {
                    tracing::warn!(game = %name, error = %e, "malformed manifest, skipping");
                },
            }
        }
        Ok(descriptors)
    }

    async fn fetch_asset(&self, game: &str, filename: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.root.join(game).join("assets").join(filename);
        Ok(tokio::fs::read(path).await?)
    }
}

/// Store backed by a remote catalog server: `GET {base}/api/games` for
/// the catalog, `GET {base}/games/{name}/assets/{file}` for assets.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl GameStore for HttpStore {
    async fn fetch_catalog(&self) -> Result<Vec<GameDescriptor>, StoreError> {
        let url = format!("{}/api/games", self.base);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn fetch_asset(&self, game: &str, filename: &str) -> Result<Vec<u8>, StoreError> {
        let url = format!("{}/games/{game}/assets/{filename}", self.base);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// In-memory store: embedded catalogs, offline demos, and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Vec<GameDescriptor>,
    assets: HashMap<(String, String), Vec<u8>>,
    fail_catalog: bool,
}

impl MemoryStore {
    pub fn new(catalog: Vec<GameDescriptor>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Store whose catalog fetch always fails.
    pub fn unreachable() -> Self {
        Self {
            fail_catalog: true,
            ..Self::default()
        }
    }

    pub fn with_asset(
        mut self,
        game: impl Into<String>,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.assets.insert((game.into(), filename.into()), bytes);
        self
    }
}

impl GameStore for MemoryStore {
    async fn fetch_catalog(&self) -> Result<Vec<GameDescriptor>, StoreError> {
        if self.fail_catalog {
            return Err(StoreError::Malformed("catalog endpoint down".into()));
        }
        Ok(self.catalog.clone())
    }

    async fn fetch_asset(&self, game: &str, filename: &str) -> Result<Vec<u8>, StoreError> {
        self.assets
            .get(&(game.to_string(), filename.to_string()))
            .cloned()
            .ok_or_else(|| {
                StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{game}/assets/{filename}"),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_game(root: &std::path::Path, name: &str, manifest: &str) {
        let dir = root.join(name);
        tokio::fs::create_dir_all(dir.join("assets")).await.unwrap();
        tokio::fs::write(dir.join("manifest.json"), manifest)
            .await
            .unwrap();
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rapidfire-store-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn dir_store_lists_games_with_manifests() {
        let root = scratch_dir("list");
        write_game(&root, "putt", r#"{ "instruction": "Putt!" }"#).await;
        write_game(&root, "arrows", r#"{ "assets": ["beep.wav"] }"#).await;
        // A directory without a manifest is skipped.
        tokio::fs::create_dir_all(root.join("unfinished"))
            .await
            .unwrap();
        // A malformed manifest is skipped too.
        write_game(&root, "broken", "{ not json").await;

        let store = DirStore::new(&root);
        let mut names: Vec<String> = store
            .fetch_catalog()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        names.sort();
        assert_eq!(names, ["arrows", "putt"]);
    }

    #[tokio::test]
    async fn dir_store_reads_assets_from_game_namespace() {
        let root = scratch_dir("asset");
        write_game(&root, "putt", "{}").await;
        tokio::fs::write(root.join("putt/assets/clink.wav"), b"RIFF")
            .await
            .unwrap();

        let store = DirStore::new(&root);
        assert_eq!(store.fetch_asset("putt", "clink.wav").await.unwrap(), b"RIFF");
        assert!(store.fetch_asset("putt", "absent.wav").await.is_err());
    }

    #[tokio::test]
    async fn dir_store_missing_root_is_an_error() {
        let store = DirStore::new("/definitely/not/a/real/path");
        assert!(store.fetch_catalog().await.is_err());
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryStore::new(vec![]).with_asset("g", "a.wav", vec![1, 2]);
        assert_eq!(store.fetch_asset("g", "a.wav").await.unwrap(), vec![1, 2]);
        assert!(store.fetch_asset("g", "b.wav").await.is_err());
        assert!(store.fetch_catalog().await.unwrap().is_empty());
        assert!(MemoryStore::unreachable().fetch_catalog().await.is_err());
    }
}
