use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assets::{AssetMap, AudioAsset};
use crate::input::InputHandle;
use crate::score::ScoreState;

/// Core trait that every rapidfire minigame must implement.
///
/// The engine owns pacing, prefetching, scoring, and teardown; the game
/// only handles its own state and rendering. A round always runs for the
/// configured fixed duration — the game cannot end it early, it can only
/// decide what `end` will report.
pub trait Microgame: Send {
    /// Called once with the drawing surface before the first frame.
    fn init(&mut self, surface: &mut Surface) -> Result<(), GameFault>;

    /// Called every frame with the time elapsed since the previous frame.
    /// Expected to render as a side effect.
    fn update(&mut self, dt: Duration) -> Result<(), GameFault>;

    /// Called exactly once at teardown. Returns the round verdict.
    fn end(&mut self) -> Result<Verdict, GameFault>;
}

/// Factory invoked when a round starts, receiving everything the game is
/// allowed to touch. Games too varied for a shared base type; each factory
/// builds its own state shape behind the trait.
pub type GameFactory = Arc<dyn Fn(GameContext) -> Box<dyn Microgame> + Send + Sync>;

/// Everything handed to a game factory: input queries, its resolved
/// assets, shared library handles, and a read-only score snapshot.
#[derive(Clone)]
pub struct GameContext {
    pub input: InputHandle,
    pub assets: AssetMap,
    pub libs: Libs,
    pub score: ScoreState,
}

/// Win/loss result a game reports at teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Win,
    Loss,
}

impl Verdict {
    pub fn is_win(self) -> bool {
        matches!(self, Self::Win)
    }
}

impl From<bool> for Verdict {
    fn from(won: bool) -> Self {
        if won { Self::Win } else { Self::Loss }
    }
}

/// A fault raised by a game's lifecycle methods. Contained at the round
/// controller boundary and converted into a loss; never crashes the
/// rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFault {
    message: String,
}

impl GameFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for GameFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GameFault {}

/// Drawing surface owned by the active round, created fresh per game and
/// released at teardown. Rendering itself happens in an external
/// collaborator; the engine only tracks dimensions and lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_HEIGHT: u32 = 600;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

/// Shared library handles passed to every game.
#[derive(Clone)]
pub struct Libs {
    pub sound: Arc<dyn SoundPlayer>,
}

impl Default for Libs {
    fn default() -> Self {
        Self {
            sound: Arc::new(NullSound),
        }
    }
}

/// Audio playback seam. Playback is an external collaborator; the engine
/// only needs play on demand and stop-at-teardown.
pub trait SoundPlayer: Send + Sync {
    fn play(&self, sound: &AudioAsset);
    fn stop(&self, sound: &AudioAsset);
}

/// Playback sink that discards everything. Used where no audio device is
/// wired up, and in tests.
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn play(&self, _sound: &AudioAsset) {}
    fn stop(&self, _sound: &AudioAsset) {}
}
