use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rapidfire_core::game_trait::{GameContext, GameFault, Microgame, Surface, Verdict};
use rapidfire_core::input::{Direction, InputHandle};

const PLAYER_SIZE: f32 = 40.0;
const BLOCK_SIZE: f32 = 40.0;
const PLAYER_SPEED: f32 = 200.0; // px/s
const BLOCK_SPEED: f32 = 200.0; // px/s
const BLOCK_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Steer left and right under a rain of falling blocks. Touch nothing
/// until the clock runs out and the round is yours.
pub struct BlockDodge {
    input: InputHandle,
    rng: StdRng,
    bounds: (f32, f32),
    player: Rect,
    blocks: Vec<Rect>,
    hit: bool,
}

impl BlockDodge {
    pub fn with_rng(context: GameContext, rng: StdRng) -> Self {
        Self {
            input: context.input,
            rng,
            bounds: (Surface::DEFAULT_WIDTH as f32, Surface::DEFAULT_HEIGHT as f32),
            player: Rect {
                x: 0.0,
                y: 0.0,
                width: PLAYER_SIZE,
                height: PLAYER_SIZE,
            },
            blocks: Vec::new(),
            hit: false,
        }
    }

    pub fn hit(&self) -> bool {
        self.hit
    }

    fn spawn_block(&mut self, stagger: f32) -> Rect {
        Rect {
            x: self.rng.random_range(0.0..self.bounds.0 - BLOCK_SIZE),
            y: -BLOCK_SIZE - stagger,
            width: BLOCK_SIZE,
            height: BLOCK_SIZE,
        }
    }
}

/// Factory conforming to the engine's game contract.
pub fn create(context: GameContext) -> Box<dyn Microgame> {
    Box::new(BlockDodge::with_rng(context, StdRng::from_os_rng()))
}

impl Microgame for BlockDodge {
    fn init(&mut self, surface: &mut Surface) -> Result<(), GameFault> {
        self.bounds = (surface.width as f32, surface.height as f32);
        self.player = Rect {
            x: (self.bounds.0 - PLAYER_SIZE) / 2.0,
            y: self.bounds.1 - PLAYER_SIZE * 2.0,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
        };
        self.blocks = (0..BLOCK_COUNT)
            .map(|i| self.spawn_block(i as f32 * self.bounds.1 / BLOCK_COUNT as f32))
            .collect();
        Ok(())
    }

    fn update(&mut self, dt: Duration) -> Result<(), GameFault> {
        let dt = dt.as_secs_f32();

        if self.input.is_held(Direction::Left) {
            self.player.x -= PLAYER_SPEED * dt;
        }
        if self.input.is_held(Direction::Right) {
            self.player.x += PLAYER_SPEED * dt;
        }
        self.player.x = self.player.x.clamp(0.0, self.bounds.0 - self.player.width);

        for i in 0..self.blocks.len() {
            self.blocks[i].y += BLOCK_SPEED * dt;
            if self.blocks[i].y > self.bounds.1 {
                self.blocks[i] = self.spawn_block(0.0);
            }
            if self.player.overlaps(&self.blocks[i]) {
                // The round still runs its full budget; a hit only decides
                // the verdict.
                self.hit = true;
            }
        }
        Ok(())
    }

    fn end(&mut self) -> Result<Verdict, GameFault> {
        Ok(Verdict::from(!self.hit))
    }
}
