mod config;
mod gamepad;
mod store;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use rapidfire_core::game_trait::Libs;
use rapidfire_core::input::{InputHandle, InputSource};
use rapidfire_core::rotation::RoundEvent;
use rapidfire_engine::prefetch::PrefetchBuffer;
use rapidfire_engine::registry::GameRegistry;
use rapidfire_engine::rotation::{RotationCommand, spawn_rotation};

use crate::config::ArcadeConfig;
use crate::gamepad::GamepadBackend;
use crate::store::ArcadeStore;

/// Every game compiled into this binary, keyed by its catalog name.
fn default_registry() -> GameRegistry {
    let mut registry = GameRegistry::new();
    #[cfg(feature = "arrows")]
    registry.register("arrows", rapidfire_arrows::create);
    #[cfg(feature = "dodge")]
    registry.register("dodge-block", rapidfire_dodge::create);
    registry
}

/// Minimal overlay presenter: renders round events into the log. The
/// real overlay (timer bar, instruction card, score widgets) consumes
/// the same event stream.
async fn present_events(mut events: mpsc::UnboundedReceiver<RoundEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            RoundEvent::SplashShown => tracing::info!("press any button to start"),
            RoundEvent::SplashDismissed => tracing::info!("starting rotation"),
            RoundEvent::RoundStarted {
                round,
                name,
                instruction,
                author,
                ..
            } => tracing::info!(
                round,
                game = %name,
                instruction = instruction.as_deref().unwrap_or(""),
                author = author.as_deref().unwrap_or("unknown"),
                "round started"
            ),
            RoundEvent::RoundEnded {
                round,
                name,
                verdict,
                score,
            } => tracing::info!(
                round,
                game = %name,
                verdict = ?verdict,
                wins = score.wins,
                losses = score.losses,
                "round over"
            ),
            RoundEvent::RotationHalted { reason } => {
                tracing::warn!(reason = ?reason, "rotation halted");
            },
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ArcadeConfig::load();
    config.validate();

    let registry = default_registry();
    if registry.is_empty() {
        tracing::warn!("no games compiled into this binary; every descriptor will be skipped");
    }

    let rotation_config = config.rotation.to_rotation_config();
    let store = ArcadeStore::from_config(&config.store);
    let buffer = match PrefetchBuffer::initialize(
        store,
        registry,
        rotation_config.buffer_size,
        rotation_config.single_game.as_deref(),
    )
    .await
    {
        Ok(buffer) => buffer,
        Err(e) => {
            tracing::error!(error = %e, "could not load any games");
            std::process::exit(1);
        },
    };
    tracing::info!(ready = buffer.ready_len(), "prefetch buffer primed");

    let input = InputHandle::new(InputSource::new(Box::new(GamepadBackend::spawn())));
    let (cmd_tx, event_rx, mut rotation_task) =
        spawn_rotation(buffer, input, Libs::default(), rotation_config);
    let presenter = tokio::spawn(present_events(event_rx));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("stop requested");
            let _ = cmd_tx.send(RotationCommand::Stop);
            let _ = (&mut rotation_task).await;
        },
        _ = &mut rotation_task => {},
    }
    let _ = presenter.await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_all_compiled_games() {
        let registry = default_registry();
        assert!(registry.contains("arrows"));
        assert!(registry.contains("dodge-block"));
        assert_eq!(registry.len(), 2);
    }
}
