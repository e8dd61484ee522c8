use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rapidfire_core::assets::{AssetHandle, AudioAsset};
use rapidfire_core::game_trait::{
    GameContext, GameFault, Libs, Microgame, Surface, Verdict,
};
use rapidfire_core::input::{Direction, InputHandle};

/// Correct presses needed to win the round.
pub const WIN_SCORE: u32 = 5;

const CHIME_ASSET: &str = "ding.wav";

/// Press the prompted direction, as many times as you can. Each hit
/// re-rolls the prompt; reach the target count before the clock runs out.
pub struct ArrowDash {
    input: InputHandle,
    libs: Libs,
    chime: Option<Arc<AudioAsset>>,
    rng: StdRng,
    target: Direction,
    score: u32,
}

impl ArrowDash {
    pub fn with_rng(context: GameContext, rng: StdRng) -> Self {
        let chime = match context.assets.get(CHIME_ASSET) {
            Some(AssetHandle::Audio(audio)) => Some(Arc::clone(audio)),
            _ => None,
        };
        Self {
            input: context.input,
            libs: context.libs,
            chime,
            rng,
            target: Direction::Up,
            score: 0,
        }
    }

    pub fn target(&self) -> Direction {
        self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn roll_new_target(&mut self) {
        let choices: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| *d != self.target)
            .collect();
        self.target = choices[self.rng.random_range(0..choices.len())];
    }
}

/// Factory conforming to the engine's game contract.
pub fn create(context: GameContext) -> Box<dyn Microgame> {
    Box::new(ArrowDash::with_rng(context, StdRng::from_os_rng()))
}

impl Microgame for ArrowDash {
    fn init(&mut self, _surface: &mut Surface) -> Result<(), GameFault> {
        self.roll_new_target();
        Ok(())
    }

    fn update(&mut self, _dt: Duration) -> Result<(), GameFault> {
        let pressed: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| self.input.just_pressed(*d))
            .collect();
        if pressed.contains(&self.target) {
            self.score += 1;
            if let Some(chime) = &self.chime {
                self.libs.sound.play(chime);
            }
            self.roll_new_target();
        }
        Ok(())
    }

    fn end(&mut self) -> Result<Verdict, GameFault> {
        Ok(Verdict::from(self.score >= WIN_SCORE))
    }
}
