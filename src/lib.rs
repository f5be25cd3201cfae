//! Space Invaders - a fixed-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, game phases)
//! - `sprite` / `assets`: Pixel surfaces and the built-in sprite sheet
//! - `render`: Drawing interface the simulation renders through
//! - `audio`: Event-driven sound cues over a host playback sink
//! - `settings`: Data-driven game balance and audio preferences

pub mod assets;
pub mod audio;
pub mod render;
pub mod settings;
pub mod sim;
pub mod sprite;
pub mod vector;

pub use assets::SpriteSheet;
pub use settings::{ConfigError, GameConfig};
pub use sim::{FixedStepper, GamePhase, Key, Simulation};
pub use vector::Vector2D;

/// Game configuration constants
pub mod consts {
    /// Largest simulation sub-step (5 ms)
    pub const MAX_STEP: f64 = 0.005;

    /// Host frame interval the native binary simulates (60 Hz)
    pub const FRAME_DT: f64 = 1.0 / 60.0;

    /// Pause / win / lost overlay text size
    pub const OVERLAY_SIZE: f32 = 20.0;
    /// HUD lives counter text size
    pub const HUD_LIVES_SIZE: f32 = 30.0;
    /// HUD currency counter text size
    pub const HUD_CURRENCY_SIZE: f32 = 20.0;
}
