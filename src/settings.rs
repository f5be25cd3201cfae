//! Game tuning and audio preferences
//!
//! Defaults reproduce the classic layout: a 480×450 play area, three bunkers,
//! and three hard-coded enemy waves. Hosts may override any field from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::EnemyDesign;
use crate::sim::collision::SolidRule;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("play area must be positive, got {width}x{height}")]
    InvalidPlayArea { width: f64, height: f64 },
    #[error("maximum simulation step must be positive, got {0}")]
    InvalidStep(f64),
    #[error("configuration has no enemy waves")]
    NoWaves,
    #[error("wave {wave} has no rows")]
    EmptyWave { wave: usize },
    #[error("wave {wave} row {row} has {ships} ships, rows need at least 2")]
    RowTooSmall { wave: usize, row: usize, ships: usize },
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("player.max_fire_level must be at most 3, got {0}")]
    InvalidFireLevel(u8),
}

/// Highest fire level there is a firing mode for
pub const MAX_FIRE_LEVEL: u8 = 3;

/// One row of an enemy formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowConfig {
    /// Ships in the row (at least 2)
    pub ships: usize,
    pub hit_points: i32,
    pub design: EnemyDesign,
}

impl RowConfig {
    pub fn new(ships: usize, hit_points: i32, design: EnemyDesign) -> Self {
        Self { ships, hit_points, design }
    }
}

/// An enemy wave: initial sweep speed and rows top to bottom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub speed: f64,
    pub rows: Vec<RowConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub lives: i32,
    /// Horizontal speed (px/s)
    pub speed: f64,
    /// Gap between the ship's bottom edge and the bottom of the play area
    pub bottom_margin: f64,
    pub upgrade_base_cost: u32,
    pub max_fire_level: u8,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            lives: 3,
            speed: 200.0,
            bottom_margin: 115.0,
            upgrade_base_cost: 200,
            max_fire_level: MAX_FIRE_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub speed: f64,
    pub hit_points: i32,
    /// Enemy shots and pickups expire this far below the player's top edge
    pub expire_below_player: f64,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 500.0,
            hit_points: 1,
            expire_below_player: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiringTuning {
    /// Cadence of the timed single-shot modes (s)
    pub single_interval: f64,
    /// Cadence of the multi-shot mode (s)
    pub multi_interval: f64,
    pub multi_count: u32,
    /// Lateral distance between multi-shot projectiles
    pub multi_spacing: f64,
}

impl Default for FiringTuning {
    fn default() -> Self {
        Self {
            single_interval: 0.2,
            multi_interval: 0.6,
            multi_count: 2,
            multi_spacing: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkTuning {
    pub duration: f64,
    pub interval: f64,
}

impl Default for BlinkTuning {
    fn default() -> Self {
        Self {
            duration: 1.0,
            interval: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationTuning {
    /// Base row width as a fraction of the play width
    pub width_fraction: f64,
    pub row_gap: f64,
    pub descent_step: f64,
    pub speed_increment: f64,
    pub max_speed: f64,
    /// Per-ship shots per second at the start of a wave
    pub initial_fire_probability: f64,
    pub fire_probability_increment: f64,
}

impl Default for FormationTuning {
    fn default() -> Self {
        Self {
            width_fraction: 0.6,
            row_gap: 10.0,
            descent_step: 10.0,
            speed_increment: 10.0,
            max_speed: 160.0,
            initial_fire_probability: 1.0,
            fire_probability_increment: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub fall_speed: f64,
    pub coin_value: u32,
    pub extra_life_chance: f64,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            fall_speed: 100.0,
            coin_value: 100,
            extra_life_chance: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BunkerTuning {
    pub count: u32,
    /// Distance from the bunkers' top edge to the bottom of the play area
    pub bottom_offset: f64,
    pub hit_points: i32,
}

impl Default for BunkerTuning {
    fn default() -> Self {
        Self {
            count: 3,
            bottom_offset: 230.0,
            hit_points: 3,
        }
    }
}

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
        }
    }
}

impl AudioSettings {
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn effective_sfx(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.sfx_volume }
    }

    pub fn effective_music(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.music_volume }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for enemy fire and drops
    pub seed: u64,
    pub play_width: f64,
    pub play_height: f64,
    /// Largest sub-step fed to the simulation (s)
    pub max_step: f64,
    pub solid_rule: SolidRule,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub firing: FiringTuning,
    pub blink: BlinkTuning,
    pub formation: FormationTuning,
    pub pickup: PickupTuning,
    pub bunker: BunkerTuning,
    pub waves: Vec<WaveConfig>,
    pub audio: AudioSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        use EnemyDesign::*;

        Self {
            seed: 0x5EED,
            play_width: 480.0,
            play_height: 450.0,
            max_step: crate::consts::MAX_STEP,
            solid_rule: SolidRule::Palette,
            player: PlayerTuning::default(),
            projectile: ProjectileTuning::default(),
            firing: FiringTuning::default(),
            blink: BlinkTuning::default(),
            formation: FormationTuning::default(),
            pickup: PickupTuning::default(),
            bunker: BunkerTuning::default(),
            waves: vec![
                WaveConfig {
                    speed: 10.0,
                    rows: vec![
                        RowConfig::new(3, 1, Scout),
                        RowConfig::new(7, 1, Crab),
                        RowConfig::new(4, 2, Squid),
                    ],
                },
                WaveConfig {
                    speed: 30.0,
                    rows: vec![
                        RowConfig::new(5, 4, Scout),
                        RowConfig::new(7, 2, Drone),
                        RowConfig::new(3, 6, Brute),
                    ],
                },
                WaveConfig {
                    speed: 20.0,
                    rows: vec![
                        RowConfig::new(5, 10, Warden),
                        RowConfig::new(7, 2, Drone),
                        RowConfig::new(5, 6, Brute),
                        RowConfig::new(6, 6, Warden),
                    ],
                },
            ],
            audio: AudioSettings::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.play_width <= 0.0 || self.play_height <= 0.0 {
            return Err(ConfigError::InvalidPlayArea {
                width: self.play_width,
                height: self.play_height,
            });
        }
        if self.max_step <= 0.0 {
            return Err(ConfigError::InvalidStep(self.max_step));
        }
        if self.player.max_fire_level > MAX_FIRE_LEVEL {
            log::warn!("rejecting configuration: player.max_fire_level = {}", self.player.max_fire_level);
            return Err(ConfigError::InvalidFireLevel(self.player.max_fire_level));
        }
        check_probability("pickup.extra_life_chance", self.pickup.extra_life_chance)?;
        check_probability("formation.width_fraction", self.formation.width_fraction)?;

        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        for (wave, config) in self.waves.iter().enumerate() {
            if config.rows.is_empty() {
                return Err(ConfigError::EmptyWave { wave });
            }
            if let Some((row, r)) = config.rows.iter().enumerate().find(|(_, r)| r.ships < 2) {
                return Err(ConfigError::RowTooSmall { wave, row, ships: r.ships });
            }
        }
        Ok(())
    }

    /// Base width of every formation row
    pub fn formation_width(&self) -> f64 {
        self.play_width * self.formation.width_fraction
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        log::warn!("rejecting configuration: {name} = {value}");
        Err(ConfigError::InvalidProbability { name, value })
    }
}
