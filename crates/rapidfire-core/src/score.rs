use serde::{Deserialize, Serialize};

use crate::game_trait::Verdict;

/// Session score, tallied across rounds. Written only by the round
/// controller at round end; games receive read-only copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub round: u32,
    pub wins: u32,
    pub losses: u32,
}

impl ScoreState {
    pub fn starting_at(round: u32) -> Self {
        Self {
            round,
            wins: 0,
            losses: 0,
        }
    }

    /// Record a finished round.
    pub fn record(&mut self, verdict: Verdict) {
        self.round += 1;
        match verdict {
            Verdict::Win => self.wins += 1,
            Verdict::Loss => self.losses += 1,
        }
    }
}
