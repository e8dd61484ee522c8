pub mod assets;
pub mod game_trait;
pub mod input;
pub mod manifest;
pub mod rotation;
pub mod score;
pub mod shuffle;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::{HashSet, VecDeque};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::assets::AudioAsset;
    use crate::game_trait::{
        GameContext, GameFactory, GameFault, Microgame, SoundPlayer, Surface, Verdict,
    };
    use crate::input::{
        GamepadSnapshot, InputBackend, InputHandle, InputSnapshot, InputSource,
    };
    use crate::manifest::{AssetSpec, GameDescriptor};

    /// Backend that replays a fixed sequence of snapshots, then repeats
    /// the last one forever.
    pub struct ScriptedBackend {
        frames: VecDeque<InputSnapshot>,
        last: InputSnapshot,
    }

    impl ScriptedBackend {
        pub fn new(frames: Vec<InputSnapshot>) -> Self {
            Self {
                frames: frames.into(),
                last: InputSnapshot::default(),
            }
        }
    }

    impl InputBackend for ScriptedBackend {
        fn sample(&mut self) -> InputSnapshot {
            if let Some(frame) = self.frames.pop_front() {
                self.last = frame;
            }
            self.last.clone()
        }
    }

    /// Snapshot with the given keyboard keys held.
    pub fn keyboard_frame(keys: &[&str]) -> InputSnapshot {
        InputSnapshot {
            keys: keys.iter().map(|k| (*k).to_string()).collect::<HashSet<_>>(),
            gamepads: Vec::new(),
        }
    }

    /// Snapshot with one controller holding the given button indices.
    pub fn pad_frame(device_id: &str, pressed: &[usize]) -> InputSnapshot {
        let len = pressed.iter().max().map_or(0, |max| max + 1);
        let mut buttons = vec![false; len];
        for &index in pressed {
            buttons[index] = true;
        }
        InputSnapshot {
            keys: HashSet::new(),
            gamepads: vec![GamepadSnapshot {
                device_id: device_id.to_string(),
                buttons,
            }],
        }
    }

    /// Input handle whose backend never reports anything held.
    pub fn idle_input() -> InputHandle {
        InputHandle::new(InputSource::new(Box::new(ScriptedBackend::new(Vec::new()))))
    }

    /// Input handle that presses a key on the given poll, for splash
    /// dismissal tests.
    pub fn pressing_input(after_polls: usize) -> InputHandle {
        let mut frames = vec![keyboard_frame(&[]); after_polls];
        frames.push(keyboard_frame(&["x"]));
        InputHandle::new(InputSource::new(Box::new(ScriptedBackend::new(frames))))
    }

    pub fn make_descriptor(name: &str) -> GameDescriptor {
        GameDescriptor {
            name: name.to_string(),
            instruction: Some(format!("Play {name}!")),
            author: Some("tester".to_string()),
            author_link: None,
            assets: Vec::new(),
        }
    }

    pub fn descriptor_with_assets(name: &str, files: &[&str]) -> GameDescriptor {
        GameDescriptor {
            assets: files
                .iter()
                .map(|f| AssetSpec::File((*f).to_string()))
                .collect(),
            ..make_descriptor(name)
        }
    }

    #[derive(Debug, Default)]
    struct ProbeCounts {
        created: u32,
        inits: u32,
        updates: u32,
        ends: u32,
        live: u32,
        max_live: u32,
    }

    /// Observation point shared between a test and the canned games it
    /// registers: lifecycle call counts plus how many instances were
    /// alive at once.
    #[derive(Debug, Clone, Default)]
    pub struct GameProbe {
        counts: Arc<Mutex<ProbeCounts>>,
    }

    impl GameProbe {
        pub fn new() -> Self {
            Self::default()
        }

        fn on_create(&self) {
            let mut counts = self.counts.lock().unwrap();
            counts.created += 1;
            counts.live += 1;
            counts.max_live = counts.max_live.max(counts.live);
        }

        fn on_drop(&self) {
            self.counts.lock().unwrap().live -= 1;
        }

        pub fn created(&self) -> u32 {
            self.counts.lock().unwrap().created
        }

        pub fn inits(&self) -> u32 {
            self.counts.lock().unwrap().inits
        }

        pub fn updates(&self) -> u32 {
            self.counts.lock().unwrap().updates
        }

        pub fn ends(&self) -> u32 {
            self.counts.lock().unwrap().ends
        }

        pub fn live(&self) -> u32 {
            self.counts.lock().unwrap().live
        }

        /// Peak number of simultaneously live game instances.
        pub fn max_live(&self) -> u32 {
            self.counts.lock().unwrap().max_live
        }
    }

    /// What a canned game should do with its lifecycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CannedBehavior {
        Win,
        Lose,
        FaultInit,
        FaultUpdate,
        FaultEnd,
    }

    struct CannedGame {
        behavior: CannedBehavior,
        probe: GameProbe,
    }

    impl Microgame for CannedGame {
        fn init(&mut self, _surface: &mut Surface) -> Result<(), GameFault> {
            self.probe.counts.lock().unwrap().inits += 1;
            if self.behavior == CannedBehavior::FaultInit {
                return Err(GameFault::new("canned init fault"));
            }
            Ok(())
        }

        fn update(&mut self, _dt: Duration) -> Result<(), GameFault> {
            self.probe.counts.lock().unwrap().updates += 1;
            if self.behavior == CannedBehavior::FaultUpdate {
                return Err(GameFault::new("canned update fault"));
            }
            Ok(())
        }

        fn end(&mut self) -> Result<Verdict, GameFault> {
            self.probe.counts.lock().unwrap().ends += 1;
            match self.behavior {
                CannedBehavior::Win => Ok(Verdict::Win),
                CannedBehavior::FaultEnd => Err(GameFault::new("canned end fault")),
                _ => Ok(Verdict::Loss),
            }
        }
    }

    impl Drop for CannedGame {
        fn drop(&mut self) {
            self.probe.on_drop();
        }
    }

    /// Factory producing games with the given scripted behavior,
    /// reporting into the probe.
    pub fn canned_factory(behavior: CannedBehavior, probe: GameProbe) -> GameFactory {
        Arc::new(move |_ctx: GameContext| {
            probe.on_create();
            Box::new(CannedGame {
                behavior,
                probe: probe.clone(),
            })
        })
    }

    /// Sound sink that counts play/stop calls.
    #[derive(Debug, Default)]
    pub struct CountingSound {
        plays: AtomicU32,
        stops: AtomicU32,
    }

    impl CountingSound {
        pub fn plays(&self) -> u32 {
            self.plays.load(Ordering::SeqCst)
        }

        pub fn stops(&self) -> u32 {
            self.stops.load(Ordering::SeqCst)
        }
    }

    impl SoundPlayer for CountingSound {
        fn play(&self, _sound: &AudioAsset) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }

        fn stop(&self, _sound: &AudioAsset) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}
