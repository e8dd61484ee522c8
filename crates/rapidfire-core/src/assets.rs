use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A decoded image, RGBA8 row-major.
#[derive(Clone, PartialEq)]
pub struct ImageAsset {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// An audio asset: undecoded file bytes plus the manifest options passed
/// through to the playback collaborator.
#[derive(Clone, PartialEq)]
pub struct AudioAsset {
    pub bytes: Vec<u8>,
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl AudioAsset {
    pub fn volume(&self) -> Option<f64> {
        self.options.get("volume").and_then(|v| v.as_f64())
    }

    pub fn looped(&self) -> bool {
        self.options
            .get("loop")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

impl fmt::Debug for AudioAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioAsset")
            .field("bytes", &self.bytes.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Handle to one loaded asset. Cheap to clone; the round and the game
/// share the underlying data until both drop their handles.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetHandle {
    Image(Arc<ImageAsset>),
    Audio(Arc<AudioAsset>),
}

impl AssetHandle {
    pub fn as_image(&self) -> Option<&ImageAsset> {
        match self {
            Self::Image(img) => Some(img),
            Self::Audio(_) => None,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioAsset> {
        match self {
            Self::Audio(audio) => Some(audio),
            Self::Image(_) => None,
        }
    }
}

/// Resolved asset mapping for one game: declared filename → handle.
pub type AssetMap = HashMap<String, AssetHandle>;
