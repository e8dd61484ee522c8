use std::fmt;

/// Fatal engine conditions. Per-asset and per-descriptor failures are
/// logged and contained; only these two surface to the user.
#[derive(Debug)]
pub enum EngineError {
    /// The catalog fetch itself failed — nothing is playable.
    CatalogUnavailable(String),
    /// The ready queue and the catalog are both empty after a refill.
    BufferStarved,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogUnavailable(reason) => {
                write!(f, "game catalog unavailable: {reason}")
            },
            Self::BufferStarved => write!(f, "no games available to play"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Failure fetching from a game store backend.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Http(reqwest::Error),
    Malformed(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::Http(e) => write!(f, "{e}"),
            Self::Malformed(m) => write!(f, "{m}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Http(e) => Some(e),
            Self::Malformed(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}
