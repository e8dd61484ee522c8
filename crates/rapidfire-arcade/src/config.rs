use std::time::Duration;

use serde::Deserialize;

use rapidfire_core::rotation::RotationConfig;

/// Top-level arcade configuration, loaded from `rapidfire.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub store: StoreConfig,
    pub rotation: RotationSettings,
}

/// Where the catalog and assets come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub mode: StoreMode,
    /// Games directory for `mode = "dir"`.
    pub games_root: String,
    /// Catalog server base URL for `mode = "http"`.
    pub base_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: StoreMode::Dir,
            games_root: "games".to_string(),
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    Dir,
    Http,
}

/// Rotation knobs, in milliseconds where timings are involved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    pub buffer_size: usize,
    pub round_duration_ms: u64,
    pub between_round_pause_ms: u64,
    pub frame_interval_ms: u64,
    pub single_game: Option<String>,
    pub suppress_splash: bool,
    pub starting_round: u32,
}

impl Default for RotationSettings {
    fn default() -> Self {
        let defaults = RotationConfig::default();
        Self {
            buffer_size: defaults.buffer_size,
            round_duration_ms: defaults.round_duration.as_millis() as u64,
            between_round_pause_ms: defaults.between_round_pause.as_millis() as u64,
            frame_interval_ms: defaults.frame_interval.as_millis() as u64,
            single_game: None,
            suppress_splash: false,
            starting_round: 0,
        }
    }
}

impl RotationSettings {
    pub fn to_rotation_config(&self) -> RotationConfig {
        RotationConfig {
            buffer_size: self.buffer_size,
            round_duration: Duration::from_millis(self.round_duration_ms),
            between_round_pause: Duration::from_millis(self.between_round_pause_ms),
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            single_game: self.single_game.clone(),
            suppress_splash: self.suppress_splash,
            starting_round: self.starting_round,
        }
    }
}

impl ArcadeConfig {
    /// Load config from `rapidfire.toml` if it exists, then apply env var
    /// overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("rapidfire.toml") {
            Ok(content) => match toml::from_str::<ArcadeConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from rapidfire.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse rapidfire.toml: {e}, using defaults");
                    ArcadeConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No rapidfire.toml found, using defaults");
                ArcadeConfig::default()
            },
        };

        if let Ok(root) = std::env::var("RAPIDFIRE_GAMES_ROOT")
            && !root.is_empty()
        {
            config.store.mode = StoreMode::Dir;
            config.store.games_root = root;
        }
        if let Ok(url) = std::env::var("RAPIDFIRE_BASE_URL")
            && !url.is_empty()
        {
            config.store.mode = StoreMode::Http;
            config.store.base_url = url;
        }
        if let Ok(game) = std::env::var("RAPIDFIRE_GAME")
            && !game.is_empty()
        {
            config.rotation.single_game = Some(game);
        }
        if let Ok(val) = std::env::var("RAPIDFIRE_SUPPRESS_SPLASH")
            && let Ok(flag) = val.parse::<bool>()
        {
            config.rotation.suppress_splash = flag;
        }
        if let Ok(val) = std::env::var("RAPIDFIRE_STARTING_ROUND")
            && let Ok(n) = val.parse::<u32>()
        {
            config.rotation.starting_round = n;
        }
        if let Ok(val) = std::env::var("RAPIDFIRE_BUFFER_SIZE")
            && let Ok(n) = val.parse::<usize>()
        {
            config.rotation.buffer_size = n;
        }
        if let Ok(val) = std::env::var("RAPIDFIRE_ROUND_DURATION_MS")
            && let Ok(n) = val.parse::<u64>()
        {
            config.rotation.round_duration_ms = n;
        }

        config
    }

    /// Validate configuration, exiting on values the engine cannot run
    /// with.
    pub fn validate(&self) {
        if self.rotation.buffer_size == 0 {
            tracing::error!("rotation.buffer_size must be > 0");
            std::process::exit(1);
        }
        if self.rotation.round_duration_ms == 0 {
            tracing::error!("rotation.round_duration_ms must be > 0");
            std::process::exit(1);
        }
        if self.rotation.frame_interval_ms == 0 {
            tracing::error!("rotation.frame_interval_ms must be > 0");
            std::process::exit(1);
        }
        if self.store.mode == StoreMode::Http && self.store.base_url.is_empty() {
            tracing::error!("store.base_url must be set for mode = \"http\"");
            std::process::exit(1);
        }
    }
}
