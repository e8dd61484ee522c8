use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};

use rapidfire_core::assets::{AssetHandle, AssetMap};
use rapidfire_core::game_trait::{GameContext, GameFault, Libs, Microgame, Surface, Verdict};
use rapidfire_core::input::InputHandle;
use rapidfire_core::rotation::{HaltReason, RotationConfig, RoundEvent, RoundPhase};
use rapidfire_core::score::ScoreState;

use crate::error::EngineError;
use crate::prefetch::{LoadedGame, PrefetchBuffer};
use crate::store::GameStore;

/// Commands sent into a running rotation.
#[derive(Debug)]
pub enum RotationCommand {
    Stop,
}

/// How one `play_round` call came out.
enum RoundOutcome {
    /// Ran the full fixed duration and was scored.
    Completed,
    /// The game never got going (instantiation or init fault); skipped.
    Skipped,
    /// Buffer and catalog are both empty; rotation cannot continue.
    Starved,
    /// A stop command arrived.
    Stopped,
}

/// The single live game of the current round, plus everything that must
/// be cancelled or released when the round ends. At most one exists at
/// any time; it never outlives `play_round`.
struct ActiveRound {
    game: Box<dyn Microgame>,
    assets: AssetMap,
    surface: Surface,
    started: Instant,
    last_frame: Instant,
    deadline: Instant,
    running: bool,
}

impl ActiveRound {
    fn begin(game: Box<dyn Microgame>, surface: Surface, assets: AssetMap, budget: Duration) -> Self {
        let now = Instant::now();
        Self {
            game,
            assets,
            surface,
            started: now,
            last_frame: now,
            deadline: now + budget,
            running: true,
        }
    }

    /// Time since the previous frame; advances the frame clock.
    fn frame_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        dt
    }

    fn stop(&mut self) {
        self.running = false;
    }

    /// Stop round-owned audio and drop every handle this round held.
    /// The game instance and its surface go down with `self`.
    fn release(self, libs: &Libs) {
        for handle in self.assets.values() {
            if let AssetHandle::Audio(audio) = handle {
                libs.sound.stop(audio);
            }
        }
        tracing::debug!(
            assets = self.assets.len(),
            surface = ?self.surface,
            "round resources released"
        );
    }
}

/// Owns the rotation: dequeues ready games, drives exactly one active
/// game per round, enforces the fixed time budget, scores the verdict,
/// and recycles resources between rounds.
pub struct RoundController<S: GameStore> {
    buffer: PrefetchBuffer<S>,
    input: InputHandle,
    libs: Libs,
    config: RotationConfig,
    score: ScoreState,
    phase: RoundPhase,
    events: mpsc::UnboundedSender<RoundEvent>,
}

impl<S: GameStore> RoundController<S> {
    pub fn new(
        buffer: PrefetchBuffer<S>,
        input: InputHandle,
        libs: Libs,
        config: RotationConfig,
        events: mpsc::UnboundedSender<RoundEvent>,
    ) -> Self {
        let score = ScoreState::starting_at(config.starting_round);
        Self {
            buffer,
            input,
            libs,
            config,
            score,
            phase: RoundPhase::Idle,
            events,
        }
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    fn emit(&self, event: RoundEvent) {
        let _ = self.events.send(event);
    }

    /// Run the rotation until stopped or starved. Waits out the start
    /// splash first unless suppressed.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<RotationCommand>) {
        if !self.config.suppress_splash && !self.wait_for_splash_dismiss(&mut commands).await {
            self.emit(RoundEvent::RotationHalted {
                reason: HaltReason::Stopped,
            });
            return;
        }

        loop {
            match self.play_round(&mut commands).await {
                RoundOutcome::Completed | RoundOutcome::Skipped => {},
                RoundOutcome::Starved => {
                    tracing::error!("no games available, halting rotation");
                    self.emit(RoundEvent::RotationHalted {
                        reason: HaltReason::NoGamesAvailable,
                    });
                    return;
                },
                RoundOutcome::Stopped => {
                    self.emit(RoundEvent::RotationHalted {
                        reason: HaltReason::Stopped,
                    });
                    return;
                },
            }

            // Breather between rounds, interruptible by Stop.
            let pause_end = Instant::now() + self.config.between_round_pause;
            tokio::select! {
                _ = sleep_until(pause_end) => {},
                cmd = commands.recv() => match cmd {
                    Some(RotationCommand::Stop) | None => {
                        self.emit(RoundEvent::RotationHalted {
                            reason: HaltReason::Stopped,
                        });
                        return;
                    },
                },
            }
        }
    }

    /// Poll input every frame until anything is pressed. Returns false
    /// if a stop command arrived instead.
    async fn wait_for_splash_dismiss(
        &mut self,
        commands: &mut mpsc::UnboundedReceiver<RotationCommand>,
    ) -> bool {
        self.emit(RoundEvent::SplashShown);
        let mut frames = interval(self.config.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = frames.tick() => {
                    self.input.poll();
                    if self.input.is_any_button_pressed() {
                        self.emit(RoundEvent::SplashDismissed);
                        return true;
                    }
                },
                cmd = commands.recv() => match cmd {
                    Some(RotationCommand::Stop) | None => return false,
                },
            }
        }
    }

    /// Dequeue the next ready game; on an empty queue, await one refill
    /// and retry once before declaring starvation.
    async fn next_loaded(&self) -> Result<LoadedGame, EngineError> {
        if let Some(next) = self.buffer.take_next() {
            return Ok(next);
        }
        tracing::warn!("game buffer empty, refilling");
        self.buffer.refill().await;
        self.buffer.take_next().ok_or(EngineError::BufferStarved)
    }

    /// One full round: Loading → Running → Ending → Idle.
    async fn play_round(
        &mut self,
        commands: &mut mpsc::UnboundedReceiver<RotationCommand>,
    ) -> RoundOutcome {
        self.phase = RoundPhase::Loading;
        let loaded = match self.next_loaded().await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(error = %e, "cannot start round");
                self.phase = RoundPhase::Idle;
                return RoundOutcome::Starved;
            },
        };
        let LoadedGame {
            descriptor,
            factory,
            assets,
        } = loaded;

        let mut surface = Surface::default();
        let context = GameContext {
            input: self.input.clone(),
            assets: assets.clone(),
            libs: self.libs.clone(),
            score: self.score,
        };
        let mut game = (factory)(context);
        if let Err(fault) = game.init(&mut surface) {
            tracing::error!(game = %descriptor.name, error = %fault, "game failed to initialize, skipping");
            self.phase = RoundPhase::Idle;
            return RoundOutcome::Skipped;
        }

        self.phase = RoundPhase::Running;
        let mut round =
            ActiveRound::begin(game, surface, assets, self.config.round_duration);
        self.emit(RoundEvent::RoundStarted {
            round: self.score.round + 1,
            name: descriptor.name.clone(),
            instruction: descriptor.instruction.clone(),
            author: descriptor.author.clone(),
            author_link: descriptor.author_link.clone(),
            duration: self.config.round_duration,
        });

        let mut frames = interval(self.config.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stopped = false;
        let mut fault: Option<GameFault> = None;
        while round.running {
            tokio::select! {
                _ = frames.tick() => {
                    self.input.poll();
                    let dt = round.frame_elapsed();
                    if let Err(f) = round.game.update(dt) {
                        fault = Some(f);
                        round.stop();
                    }
                },
                _ = sleep_until(round.deadline) => round.stop(),
                cmd = commands.recv() => match cmd {
                    Some(RotationCommand::Stop) | None => {
                        stopped = true;
                        round.stop();
                    },
                },
            }
        }
        // The frame ticker dies here, before teardown touches the game,
        // so no stale tick can fire into the next round's state. The
        // deadline sleep is select-scoped and already gone.
        drop(frames);

        self.phase = RoundPhase::Ending;
        if stopped {
            round.release(&self.libs);
            self.phase = RoundPhase::Idle;
            return RoundOutcome::Stopped;
        }

        let verdict = match fault {
            Some(fault) => {
                tracing::error!(
                    game = %descriptor.name,
                    error = %fault,
                    "game faulted mid-round, counting as loss"
                );
                Verdict::Loss
            },
            None => match round.game.end() {
                Ok(verdict) => verdict,
                Err(fault) => {
                    tracing::error!(
                        game = %descriptor.name,
                        error = %fault,
                        "game faulted reporting its verdict, counting as loss"
                    );
                    Verdict::Loss
                },
            },
        };
        self.score.record(verdict);
        tracing::info!(
            game = %descriptor.name,
            round = self.score.round,
            verdict = ?verdict,
            elapsed = ?round.started.elapsed(),
            "round over"
        );
        round.release(&self.libs);
        self.phase = RoundPhase::Idle;
        self.emit(RoundEvent::RoundEnded {
            round: self.score.round,
            name: descriptor.name,
            verdict,
            score: self.score,
        });
        RoundOutcome::Completed
    }
}

/// Spawn a rotation as a tokio task. Returns the command sender, the
/// event stream for the overlay presenter, and the task handle.
pub fn spawn_rotation<S: GameStore>(
    buffer: PrefetchBuffer<S>,
    input: InputHandle,
    libs: Libs,
    config: RotationConfig,
) -> (
    mpsc::UnboundedSender<RotationCommand>,
    mpsc::UnboundedReceiver<RoundEvent>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let controller = RoundController::new(buffer, input, libs, config, event_tx);
    let handle = tokio::spawn(controller.run(cmd_rx));
    (cmd_tx, event_rx, handle)
}
