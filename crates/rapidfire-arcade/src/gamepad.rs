use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gilrs::{Button, Gamepad, Gilrs};

use rapidfire_core::input::{GamepadSnapshot, InputBackend, InputSnapshot};

/// Poll period for the capture thread, a bit faster than the frame tick.
const POLL_PERIOD: Duration = Duration::from_millis(8);

/// Standard-gamepad button order; the d-pad lands on indices 12-15, which
/// is what the default `ButtonLayout` expects.
const BUTTON_ORDER: [Button; 16] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// Controller capture backend. A dedicated thread owns the gilrs context
/// and keeps publishing the latest snapshot, so controller state is live
/// even before the first round starts; `sample` just reads it.
pub struct GamepadBackend {
    latest: Arc<Mutex<InputSnapshot>>,
}

impl GamepadBackend {
    pub fn spawn() -> Self {
        let latest = Arc::new(Mutex::new(InputSnapshot::default()));
        let shared = Arc::clone(&latest);
        let spawned = std::thread::Builder::new()
            .name("gamepad-poll".to_string())
            .spawn(move || poll_loop(&shared));
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to start gamepad capture thread");
        }
        Self { latest }
    }
}

impl InputBackend for GamepadBackend {
    fn sample(&mut self) -> InputSnapshot {
        self.latest.lock().unwrap().clone()
    }
}

fn poll_loop(shared: &Mutex<InputSnapshot>) {
    let mut gilrs = match Gilrs::new() {
        Ok(gilrs) => gilrs,
        Err(e) => {
            tracing::warn!(error = %e, "gamepad support unavailable");
            return;
        },
    };
    loop {
        // Drain events so the cached gamepad state is current.
        while gilrs.next_event().is_some() {}
        let gamepads = gilrs
            .gamepads()
            .map(|(_, gamepad)| GamepadSnapshot {
                device_id: gamepad.name().to_string(),
                buttons: read_buttons(&gamepad),
            })
            .collect();
        *shared.lock().unwrap() = InputSnapshot {
            keys: HashSet::new(),
            gamepads,
        };
        std::thread::sleep(POLL_PERIOD);
    }
}

fn read_buttons(gamepad: &Gamepad<'_>) -> Vec<bool> {
    BUTTON_ORDER
        .iter()
        .map(|button| gamepad.is_pressed(*button))
        .collect()
}
