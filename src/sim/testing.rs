//! Shared fixtures for simulation unit tests

use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::sync::Arc;

use super::entity::{Entity, TickContext};
use super::game::player_origin;
use super::input::KeyState;
use super::pickup::Pickup;
use super::player::PlayerLoadout;
use super::projectile::Projectile;
use super::ship::{FireMode, Ship};
use super::state::{Camp, GameEvent, PickupKind};
use super::store::{EntityId, EntityStore, Pending};
use crate::assets::SpriteSheet;
use crate::settings::GameConfig;
use crate::vector::Vector2D;

/// Everything a `TickContext` borrows, owned in one place
pub struct Harness {
    pub config: GameConfig,
    pub sprites: SpriteSheet,
    pub keys: KeyState,
    pub rng: Pcg32,
    pub events: Vec<GameEvent>,
    pub pending: Pending,
    pub store: EntityStore,
    pub player: EntityId,
    pub player_line: f64,
}

impl Harness {
    pub fn new() -> Self {
        let config = GameConfig::default();
        let sprites = SpriteSheet::procedural().unwrap();
        let mut pending = Pending::default();

        // Resolves to nothing until a player is spawned
        let player = pending.reserve_id();

        Self {
            player_line: player_origin(&config, &sprites.player).y,
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            sprites,
            keys: KeyState::default(),
            events: Vec::new(),
            pending,
            store: EntityStore::default(),
            player,
        }
    }

    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut TickContext, &mut EntityStore) -> R) -> R {
        let mut ctx = TickContext {
            config: &self.config,
            sprites: &self.sprites,
            keys: &mut self.keys,
            rng: &mut self.rng,
            events: &mut self.events,
            pending: &mut self.pending,
            player: self.player,
            player_line: self.player_line,
        };
        f(&mut ctx, &mut self.store)
    }

    /// Stage and immediately admit an entity
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = self.pending.stage(entity);
        self.admit();
        id
    }

    pub fn admit(&mut self) {
        self.store.admit(&mut self.pending);
    }

    pub fn projectile(&self, camp: Camp, position: Vector2D) -> Projectile {
        let tuning = &self.config.projectile;
        Projectile::new(position, Arc::clone(&self.sprites.missile), camp, tuning.hit_points, tuning.speed)
    }

    pub fn advance_projectile(&mut self, shot: &mut Projectile, dt: f64) {
        self.with_ctx(|ctx, store| shot.advance(ctx, store, dt));
    }

    pub fn enemy(&self, position: Vector2D, hit_points: i32) -> Ship {
        Ship::enemy(position, Arc::clone(&self.sprites.crab), hit_points)
    }

    pub fn player_ship(&self, position: Vector2D) -> Ship {
        let tuning = &self.config.player;
        Ship::player(
            position,
            Arc::clone(&self.sprites.player),
            tuning.lives,
            tuning.speed,
            PlayerLoadout::new(tuning.upgrade_base_cost),
        )
    }

    /// Admit a player ship at the start position; returns its position
    pub fn spawn_player(&mut self) -> Vector2D {
        let position = player_origin(&self.config, &self.sprites.player);
        let ship = self.player_ship(position);
        self.player = self.add(Entity::Ship(ship));
        self.player_line = position.y;
        position
    }

    pub fn player(&self) -> Option<&Ship> {
        self.store.get(self.player).and_then(Entity::as_ship)
    }

    pub fn shoot(&mut self, ship: &mut Ship, mode: FireMode, dt: f64) {
        self.with_ctx(|ctx, store| ship.shoot(mode, dt, ctx, store));
    }

    pub fn hit(&mut self, ship: &mut Ship, shot: &mut Projectile, pixels: u32) {
        self.with_ctx(|ctx, _| ship.on_hit(shot, pixels, ctx));
    }

    pub fn control(&mut self, ship: &mut Ship, dt: f64) {
        self.with_ctx(|ctx, store| ship.control(ctx, store, dt));
    }

    pub fn pickup(&self, kind: PickupKind, position: Vector2D) -> Pickup {
        let sprite = match kind {
            PickupKind::Coin => Arc::clone(&self.sprites.coin),
            PickupKind::ExtraLife => Arc::clone(&self.sprites.extra_life),
        };
        Pickup::new(kind, position, sprite, self.config.pickup.fall_speed)
    }

    pub fn advance_pickup(&mut self, pickup: &mut Pickup, dt: f64) {
        self.with_ctx(|ctx, store| pickup.advance(ctx, store, dt));
    }
}
