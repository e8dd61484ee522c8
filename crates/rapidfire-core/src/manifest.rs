use serde::{Deserialize, Serialize};

/// Metadata record identifying a playable game, as served by the catalog
/// endpoint. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDescriptor {
    /// Unique id; doubles as the registry key and the static asset namespace.
    pub name: String,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, rename = "authorLink")]
    pub author_link: Option<String>,
    #[serde(default)]
    pub assets: Vec<AssetSpec>,
}

/// A declared asset: either a bare filename or a record with extra options
/// (volume, looping, whatever the playback collaborator understands).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetSpec {
    File(String),
    Configured {
        file: String,
        #[serde(flatten)]
        options: serde_json::Map<String, serde_json::Value>,
    },
}

impl AssetSpec {
    pub fn filename(&self) -> &str {
        match self {
            Self::File(name) => name,
            Self::Configured { file, .. } => file,
        }
    }

    pub fn options(&self) -> serde_json::Map<String, serde_json::Value> {
        match self {
            Self::File(_) => serde_json::Map::new(),
            Self::Configured { options, .. } => options.clone(),
        }
    }
}

/// Media category an asset filename maps to, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Audio,
}

/// Classify a declared filename. `None` means the extension is not
/// recognized and the asset should be skipped with a warning.
pub fn classify_asset(filename: &str) -> Option<AssetKind> {
    let ext = filename.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext.to_ascii_lowercase().as_str() {
        "png" | "jpg" | "jpeg" => Some(AssetKind::Image),
        "mp3" | "wav" => Some(AssetKind::Audio),
        _ => None,
    }
}

/// The on-disk `manifest.json` shape: everything in `GameDescriptor` except
/// the name, which comes from the directory that holds the file.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, rename = "authorLink")]
    pub author_link: Option<String>,
    #[serde(default)]
    pub assets: Vec<AssetSpec>,
}

impl ManifestFile {
    pub fn into_descriptor(self, name: impl Into<String>) -> GameDescriptor {
        GameDescriptor {
            name: name.into(),
            instruction: self.instruction,
            author: self.author,
            author_link: self.author_link,
            assets: self.assets,
        }
    }
}
