use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game_trait::Verdict;
use crate::score::ScoreState;

/// Configuration for the game rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Target number of fully loaded games kept ready, capped to the
    /// catalog size.
    pub buffer_size: usize,
    /// Fixed time budget per round.
    pub round_duration: Duration,
    /// Pause between one round's teardown and the next round's start.
    pub between_round_pause: Duration,
    /// Frame tick period for game updates and input polling.
    pub frame_interval: Duration,
    /// When set, the catalog is restricted to this one game (repeat mode).
    pub single_game: Option<String>,
    /// Skip the any-input start splash and begin rotating immediately.
    pub suppress_splash: bool,
    /// Round counter the session starts from.
    pub starting_round: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            buffer_size: 3,
            round_duration: Duration::from_millis(5000),
            between_round_pause: Duration::from_millis(1000),
            frame_interval: Duration::from_millis(16),
            single_game: None,
            suppress_splash: false,
            starting_round: 0,
        }
    }
}

/// Where the round controller currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    Loading,
    Running,
    Ending,
}

/// Why the rotation came to a halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The prefetch buffer and the catalog are both empty.
    NoGamesAvailable,
    /// A stop command was received.
    Stopped,
}

/// Events the round controller emits for the overlay presenter (timer
/// bar, instruction text, credits, score display) and for tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    SplashShown,
    SplashDismissed,
    RoundStarted {
        round: u32,
        name: String,
        instruction: Option<String>,
        author: Option<String>,
        author_link: Option<String>,
        duration: Duration,
    },
    RoundEnded {
        round: u32,
        name: String,
        verdict: Verdict,
        score: ScoreState,
    },
    RotationHalted {
        reason: HaltReason,
    },
}
