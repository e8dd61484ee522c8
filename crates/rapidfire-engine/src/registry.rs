use std::collections::HashMap;
use std::sync::Arc;

use rapidfire_core::game_trait::{GameContext, GameFactory, Microgame};

/// Registry mapping descriptor names to game factories. The descriptor's
/// name is its entrypoint reference: a descriptor with no registered
/// factory cannot be loaded.
#[derive(Clone, Default)]
pub struct GameRegistry {
    factories: HashMap<String, GameFactory>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(GameContext) -> Box<dyn Microgame> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Register an already-shared factory.
    pub fn register_shared(&mut self, name: impl Into<String>, factory: GameFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn factory(&self, name: &str) -> Option<GameFactory> {
        self.factories.get(name).map(Arc::clone)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Number of registered game types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRegistry")
            .field("games", &self.factories.len())
            .finish()
    }
}
