//! Logical key state fed by the host

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
    Upgrade,
    Restart,
}

/// Set of currently held keys
///
/// The simulation may release a key itself so that toggles need a fresh
/// press instead of firing on every tick the key is held.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: HashSet<Key>,
}

impl KeyState {
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Returns whether the key was held, releasing it
    pub fn consume(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }
}
