//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-driven steps, sliced by [`FixedStepper`]
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies beyond the [`RenderTarget`](crate::render::RenderTarget) trait

pub mod barrier;
pub mod body;
pub mod clock;
pub mod collision;
pub mod entity;
pub mod formation;
pub mod game;
pub mod input;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod ship;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use barrier::Barrier;
pub use body::Body;
pub use clock::{Clock, FixedStepper};
pub use collision::{Rect, SolidRule, pixel_overlap_count, rectangles_overlap};
pub use entity::{Entity, TickContext};
pub use formation::Formation;
pub use game::Simulation;
pub use input::{Key, KeyState};
pub use pickup::Pickup;
pub use player::{PlayerLoadout, UpgradeRejected};
pub use projectile::Projectile;
pub use ship::{FireMode, Ship, ShipRole};
pub use state::{Camp, FormationSnapshot, GameEvent, GamePhase, PickupKind, Snapshot};
pub use store::{EntityId, EntityStore, Pending, handle_alive};
