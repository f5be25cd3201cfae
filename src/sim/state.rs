//! Game state and core simulation types

use serde::{Deserialize, Serialize};

use crate::vector::Vector2D;

/// Affiliation deciding who can damage whom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Camp {
    Player,
    Enemy,
    /// Terrain: hit by everyone, fights no one
    Neutral,
    /// Falling rewards: projectiles pass through them
    Pickup,
}

impl Camp {
    /// Whether a victim of this camp loses the pixels a projectile overlaps
    #[inline]
    pub fn erodes(self) -> bool {
        !matches!(self, Camp::Enemy | Camp::Pickup)
    }

    /// Vertical travel direction of projectiles fired by this camp
    #[inline]
    pub fn projectile_direction(self) -> f64 {
        match self {
            Camp::Enemy => 1.0,
            _ => -1.0,
        }
    }
}

/// Current phase of a playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Play,
    Pause,
    Win,
    Lost,
}

/// Effect carried by a falling pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Adds currency towards fire upgrades
    Coin,
    /// Adds one hit point to the player
    ExtraLife,
}

/// Things that happened during a tick, drained by the host for audio and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { camp: Camp },
    ShipHit { camp: Camp, remaining: i32 },
    ShipDestroyed { camp: Camp, position: Vector2D },
    BarrierHit { pixels: u32 },
    PickupDropped { kind: PickupKind },
    PickupCollected { kind: PickupKind },
    Upgraded { level: u8, cost: u32 },
    WaveStarted { wave: usize },
    PhaseChanged { from: GamePhase, to: GamePhase },
    Restarted,
}

/// Formation summary for snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationSnapshot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub members: usize,
    pub speed: f64,
    pub direction: f64,
}

/// Serializable summary of a running simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// Index of the active wave (0-based)
    pub wave: usize,
    pub ticks: u64,
    pub player_lives: i32,
    pub currency: u32,
    pub fire_level: u8,
    pub upgrade_cost: u32,
    pub live_entities: usize,
    pub pending_entities: usize,
    pub formation: Option<FormationSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erosion_exemptions() {
        assert!(Camp::Player.erodes());
        assert!(Camp::Neutral.erodes());
        assert!(!Camp::Enemy.erodes());
        assert!(!Camp::Pickup.erodes());
    }

    #[test]
    fn test_projectile_direction() {
        assert_eq!(Camp::Enemy.projectile_direction(), 1.0);
        assert_eq!(Camp::Player.projectile_direction(), -1.0);
    }
}
