use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use rapidfire_core::game_trait::Verdict;
use rapidfire_core::rotation::{RotationConfig, RoundEvent};
use rapidfire_core::score::ScoreState;

/// Test-scaled timings: 100 ms rounds, 20 ms pauses, 5 ms frames.
pub fn fast_config() -> RotationConfig {
    RotationConfig {
        buffer_size: 2,
        round_duration: Duration::from_millis(100),
        between_round_pause: Duration::from_millis(20),
        frame_interval: Duration::from_millis(5),
        suppress_splash: true,
        ..RotationConfig::default()
    }
}

pub async fn next_event(events: &mut UnboundedReceiver<RoundEvent>) -> RoundEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for a round event")
        .expect("event channel closed")
}

/// Skip ahead to the next RoundEnded.
pub async fn next_round_end(
    events: &mut UnboundedReceiver<RoundEvent>,
) -> (String, Verdict, ScoreState) {
    loop {
        if let RoundEvent::RoundEnded {
            name,
            verdict,
            score,
            ..
        } = next_event(events).await
        {
            return (name, verdict, score);
        }
    }
}
