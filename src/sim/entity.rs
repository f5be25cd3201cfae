//! Entity variants and per-variant dispatch
//!
//! Every simulation object is one `Entity` variant. Advancing, drawing,
//! liveness and the reaction to a projectile are dispatched here by
//! matching on the variant.

use rand_pcg::Pcg32;

use super::barrier::Barrier;
use super::formation::Formation;
use super::input::KeyState;
use super::pickup::Pickup;
use super::projectile::Projectile;
use super::ship::Ship;
use super::state::{Camp, GameEvent};
use super::store::{EntityId, EntityStore, Pending, handle_alive};
use crate::assets::SpriteSheet;
use crate::render::RenderTarget;
use crate::settings::GameConfig;
use crate::vector::Vector2D;

/// Everything an entity may touch while it advances, besides the live set
pub struct TickContext<'a> {
    pub config: &'a GameConfig,
    pub sprites: &'a SpriteSheet,
    pub keys: &'a mut KeyState,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
    pub pending: &'a mut Pending,
    pub player: EntityId,
    /// Player's top edge; enemy shots and pickups expire below it
    pub player_line: f64,
}

impl TickContext<'_> {
    /// Stage a new entity for admission next tick
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.pending.stage(entity)
    }

    /// Weak-handle query: staged or live and not dead
    pub fn is_alive(&self, store: &EntityStore, id: EntityId) -> bool {
        handle_alive(store, self.pending, id)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Y coordinate below which enemy shots and pickups are discarded
    pub fn expiry_line(&self) -> f64 {
        self.player_line + self.config.projectile.expire_below_player
    }
}

#[derive(Debug, Clone)]
pub enum Entity {
    Ship(Ship),
    Projectile(Projectile),
    Formation(Formation),
    Pickup(Pickup),
    Barrier(Barrier),
}

impl Entity {
    pub fn camp(&self) -> Camp {
        match self {
            Entity::Ship(ship) => ship.camp(),
            Entity::Projectile(projectile) => projectile.camp,
            Entity::Formation(_) => Camp::Enemy,
            Entity::Pickup(_) => Camp::Pickup,
            Entity::Barrier(_) => Camp::Neutral,
        }
    }

    pub fn is_alive(&self) -> bool {
        match self {
            Entity::Ship(ship) => ship.is_alive(),
            Entity::Projectile(projectile) => projectile.is_alive(),
            Entity::Formation(formation) => formation.is_alive(),
            Entity::Pickup(pickup) => pickup.is_alive(),
            Entity::Barrier(barrier) => barrier.is_alive(),
        }
    }

    /// Top-left corner of the entity (bounding box for formations)
    pub fn position(&self) -> Vector2D {
        match self {
            Entity::Ship(ship) => ship.body.position,
            Entity::Projectile(projectile) => projectile.body.position,
            Entity::Formation(formation) => formation.position(),
            Entity::Pickup(pickup) => pickup.body.position,
            Entity::Barrier(barrier) => barrier.body.position,
        }
    }

    /// Advance by `dt` seconds. `store` holds every other live entity.
    pub fn advance(&mut self, ctx: &mut TickContext, store: &mut EntityStore, dt: f64) {
        match self {
            Entity::Ship(ship) => ship.advance(ctx, store, dt),
            Entity::Projectile(projectile) => projectile.advance(ctx, store, dt),
            Entity::Formation(formation) => formation.advance(ctx, store, dt),
            Entity::Pickup(pickup) => pickup.advance(ctx, store, dt),
            Entity::Barrier(_) => {}
        }
    }

    /// React to an incoming projectile
    pub fn collide(&mut self, projectile: &mut Projectile, ctx: &mut TickContext) {
        let rule = ctx.config.solid_rule;
        match self {
            Entity::Ship(ship) => {
                let camp = ship.camp();
                if let Some(pixels) = ship.body.hit_test(camp, projectile, rule) {
                    ship.on_hit(projectile, pixels, ctx);
                }
            }
            Entity::Projectile(other) => {
                if let Some(pixels) = other.body.hit_test(other.camp, projectile, rule) {
                    other.absorb(pixels);
                    projectile.absorb(pixels);
                }
            }
            Entity::Formation(formation) => formation.collide(projectile, ctx),
            Entity::Pickup(_) => {}
            Entity::Barrier(barrier) => barrier.collide(projectile, ctx),
        }
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        match self {
            Entity::Ship(ship) => ship.draw(target),
            Entity::Projectile(projectile) => projectile.body.draw(target),
            Entity::Formation(formation) => formation.draw(target),
            Entity::Pickup(pickup) => pickup.body.draw(target),
            Entity::Barrier(barrier) => barrier.body.draw(target),
        }
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match self {
            Entity::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match self {
            Entity::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_formation(&self) -> Option<&Formation> {
        match self {
            Entity::Formation(formation) => Some(formation),
            _ => None,
        }
    }

    pub fn as_formation_mut(&mut self) -> Option<&mut Formation> {
        match self {
            Entity::Formation(formation) => Some(formation),
            _ => None,
        }
    }
}
