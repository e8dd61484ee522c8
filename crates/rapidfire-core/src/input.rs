use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// The four cardinal directions games can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Keyboard key names bound to a direction.
fn keys_for(direction: Direction) -> &'static [&'static str] {
    match direction {
        Direction::Up => &["ArrowUp", "w", "W"],
        Direction::Down => &["ArrowDown", "s", "S"],
        Direction::Left => &["ArrowLeft", "a", "A"],
        Direction::Right => &["ArrowRight", "d", "D"],
    }
}

/// One controller's raw state for a single poll: a device identifier and
/// the pressed flag per button index, laid out standard-gamepad style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamepadSnapshot {
    pub device_id: String,
    pub buttons: Vec<bool>,
}

/// Raw input state captured by a backend at one instant: the set of held
/// keyboard key names plus every connected controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub keys: HashSet<String>,
    pub gamepads: Vec<GamepadSnapshot>,
}

/// Raw capture seam. Device polling internals live behind this trait so
/// the source can be driven by a real controller backend or a scripted
/// one in tests.
pub trait InputBackend: Send {
    fn sample(&mut self) -> InputSnapshot;
}

/// Button-index layout for one controller model, standard-gamepad d-pad
/// indices by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonLayout {
    pub up: usize,
    pub down: usize,
    pub left: usize,
    pub right: usize,
}

impl Default for ButtonLayout {
    fn default() -> Self {
        Self {
            up: 12,
            down: 13,
            left: 14,
            right: 15,
        }
    }
}

impl ButtonLayout {
    fn button(&self, direction: Direction) -> usize {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Merged per-direction state for one poll.
#[derive(Debug, Clone, Copy, Default)]
struct MergedState {
    held: [bool; 4],
    any_button: bool,
}

/// Merges keyboard and gamepad state into the directional queries games
/// consume, with edge detection against the previous poll. Polled once
/// per frame by the round controller, whether or not a game is active.
pub struct InputSource {
    backend: Box<dyn InputBackend>,
    layouts: HashMap<String, ButtonLayout>,
    default_layout: ButtonLayout,
    cur: MergedState,
    prev: MergedState,
}

impl InputSource {
    pub fn new(backend: Box<dyn InputBackend>) -> Self {
        Self {
            backend,
            layouts: HashMap::new(),
            default_layout: ButtonLayout::default(),
            cur: MergedState::default(),
            prev: MergedState::default(),
        }
    }

    /// Register a button layout for a specific controller model. Devices
    /// without an entry fall back to the default layout.
    pub fn with_layout(mut self, device_id: impl Into<String>, layout: ButtonLayout) -> Self {
        self.layouts.insert(device_id.into(), layout);
        self
    }

    /// Sample the backend and advance the edge-detection window.
    pub fn poll(&mut self) {
        let snapshot = self.backend.sample();
        self.prev = self.cur;

        let mut held = [false; 4];
        for direction in Direction::ALL {
            let keyboard = keys_for(direction)
                .iter()
                .any(|key| snapshot.keys.contains(*key));
            let gamepad = snapshot.gamepads.iter().any(|pad| {
                let layout = self
                    .layouts
                    .get(&pad.device_id)
                    .unwrap_or(&self.default_layout);
                pad.buttons
                    .get(layout.button(direction))
                    .copied()
                    .unwrap_or(false)
            });
            held[direction.index()] = keyboard || gamepad;
        }

        let any_button = !snapshot.keys.is_empty()
            || snapshot
                .gamepads
                .iter()
                .any(|pad| pad.buttons.iter().any(|pressed| *pressed));

        self.cur = MergedState { held, any_button };
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.cur.held[direction.index()]
    }

    /// True only on the first poll a direction is held; a direction held
    /// across consecutive polls does not re-trigger.
    pub fn just_pressed(&self, direction: Direction) -> bool {
        self.cur.held[direction.index()] && !self.prev.held[direction.index()]
    }

    pub fn just_released(&self, direction: Direction) -> bool {
        !self.cur.held[direction.index()] && self.prev.held[direction.index()]
    }

    /// Any key or controller button down in the current poll. Used to
    /// dismiss the start splash.
    pub fn is_any_button_pressed(&self) -> bool {
        self.cur.any_button
    }
}

/// Cloneable handle to the one input source, shared between the round
/// controller (which polls) and games (which query).
#[derive(Clone)]
pub struct InputHandle {
    source: Arc<Mutex<InputSource>>,
}

impl InputHandle {
    pub fn new(source: InputSource) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
        }
    }

    pub fn poll(&self) {
        self.source.lock().unwrap().poll();
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.source.lock().unwrap().is_held(direction)
    }

    pub fn just_pressed(&self, direction: Direction) -> bool {
        self.source.lock().unwrap().just_pressed(direction)
    }

    pub fn just_released(&self, direction: Direction) -> bool {
        self.source.lock().unwrap().just_released(direction)
    }

    pub fn is_any_button_pressed(&self) -> bool {
        self.source.lock().unwrap().is_any_button_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedBackend, keyboard_frame, pad_frame};

    fn source_with(frames: Vec<InputSnapshot>) -> InputSource {
        InputSource::new(Box::new(ScriptedBackend::new(frames)))
    }

    #[test]
    fn keyboard_keys_map_to_directions() {
        let mut input = source_with(vec![keyboard_frame(&["ArrowLeft"])]);
        input.poll();
        assert!(input.is_held(Direction::Left));
        assert!(!input.is_held(Direction::Right));
        assert!(input.just_pressed(Direction::Left));
    }

    #[test]
    fn held_across_polls_does_not_retrigger_just_pressed() {
        let mut input = source_with(vec![
            keyboard_frame(&["w"]),
            keyboard_frame(&["w"]),
        ]);
        input.poll();
        assert!(input.just_pressed(Direction::Up));
        input.poll();
        assert!(input.is_held(Direction::Up));
        assert!(!input.just_pressed(Direction::Up));
    }

    #[test]
    fn release_edge_fires_once() {
        let mut input = source_with(vec![
            keyboard_frame(&["ArrowDown"]),
            keyboard_frame(&[]),
            keyboard_frame(&[]),
        ]);
        input.poll();
        input.poll();
        assert!(input.just_released(Direction::Down));
        input.poll();
        assert!(!input.just_released(Direction::Down));
    }

    #[test]
    fn gamepad_dpad_uses_default_layout_for_unknown_device() {
        let mut input = source_with(vec![pad_frame("mystery-pad", &[14])]);
        input.poll();
        assert!(input.is_held(Direction::Left));
    }

    #[test]
    fn gamepad_layout_table_overrides_default() {
        let remapped = ButtonLayout {
            up: 0,
            down: 1,
            left: 2,
            right: 3,
        };
        let backend = ScriptedBackend::new(vec![pad_frame("odd-pad", &[2])]);
        let mut input = InputSource::new(Box::new(backend)).with_layout("odd-pad", remapped);
        input.poll();
        assert!(input.is_held(Direction::Left));
        assert!(!input.is_held(Direction::Up));
    }

    #[test]
    fn keyboard_and_gamepad_merge() {
        let mut frame = keyboard_frame(&["ArrowUp"]);
        frame
            .gamepads
            .push(pad_frame("pad", &[15]).gamepads.remove(0));
        let mut input = source_with(vec![frame]);
        input.poll();
        assert!(input.is_held(Direction::Up));
        assert!(input.is_held(Direction::Right));
    }

    #[test]
    fn any_button_sees_keys_and_pads() {
        let mut input = source_with(vec![
            keyboard_frame(&[]),
            keyboard_frame(&["x"]),
            pad_frame("pad", &[0]),
            keyboard_frame(&[]),
        ]);
        input.poll();
        assert!(!input.is_any_button_pressed());
        input.poll();
        assert!(input.is_any_button_pressed());
        input.poll();
        assert!(input.is_any_button_pressed());
        input.poll();
        assert!(!input.is_any_button_pressed());
    }

    #[test]
    fn short_button_array_is_not_held() {
        // A controller reporting fewer buttons than the d-pad indices.
        let mut input = source_with(vec![pad_frame("tiny", &[0])]);
        input.poll();
        for direction in Direction::ALL {
            assert!(!input.is_held(direction));
        }
        assert!(input.is_any_button_pressed());
    }

    #[test]
    fn handle_shares_one_source() {
        let handle = InputHandle::new(source_with(vec![keyboard_frame(&["a"])]));
        let clone = handle.clone();
        handle.poll();
        assert!(clone.is_held(Direction::Left));
    }
}
