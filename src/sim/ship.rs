//! Ships: firing modes, impact reaction, hit blink
//!
//! Enemy ships live inside a formation and are advanced by it; the player's
//! ship is a top-level entity driven by the key state (see `player.rs`).

use std::sync::Arc;

use rand::Rng;

use super::body::Body;
use super::entity::{Entity, TickContext};
use super::pickup::Pickup;
use super::player::PlayerLoadout;
use super::projectile::Projectile;
use super::state::{Camp, GameEvent, PickupKind};
use super::store::{EntityId, EntityStore};
use crate::render::RenderTarget;
use crate::sprite::Sprite;
use crate::vector::Vector2D;

/// Firing pattern, selected by upgrade level 0-3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireMode {
    /// One projectile, re-fired only once the previous one is gone
    Single,
    /// Several side-by-side projectiles on a cadence, once the last is gone
    Multiple,
    /// One projectile per cadence interval regardless of earlier shots
    Timed,
    /// `Timed` with the alternate projectile sprite
    TimedAlt,
}

impl FireMode {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => FireMode::Single,
            1 => FireMode::Multiple,
            2 => FireMode::Timed,
            _ => FireMode::TimedAlt,
        }
    }
}

/// Who controls the ship
#[derive(Debug, Clone)]
pub enum ShipRole {
    Enemy,
    Player(PlayerLoadout),
}

/// Visibility toggling after a non-lethal hit
#[derive(Debug, Clone, Default)]
struct Blink {
    remaining: f64,
    until_toggle: f64,
    hidden: bool,
}

impl Blink {
    fn start(&mut self, duration: f64, interval: f64) {
        self.remaining = duration;
        self.until_toggle = interval;
        self.hidden = false;
    }

    fn advance(&mut self, dt: f64, interval: f64) {
        if self.remaining <= 0.0 {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.hidden = false;
            return;
        }
        if interval <= 0.0 {
            return;
        }
        self.until_toggle -= dt;
        while self.until_toggle <= 0.0 {
            self.hidden = !self.hidden;
            self.until_toggle += interval;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub body: Body,
    pub role: ShipRole,
    /// Horizontal speed (px/s)
    pub speed: f64,
    /// Time accumulated towards the next timed shot
    fire_timer: f64,
    /// Weak handle to the most recent projectile
    last_shot: Option<EntityId>,
    blink: Blink,
}

impl Ship {
    pub fn enemy(position: Vector2D, sprite: Arc<Sprite>, hit_points: i32) -> Self {
        Self::with_role(position, sprite, hit_points, ShipRole::Enemy, 0.0)
    }

    pub fn player(position: Vector2D, sprite: Arc<Sprite>, hit_points: i32, speed: f64, loadout: PlayerLoadout) -> Self {
        Self::with_role(position, sprite, hit_points, ShipRole::Player(loadout), speed)
    }

    fn with_role(position: Vector2D, sprite: Arc<Sprite>, hit_points: i32, role: ShipRole, speed: f64) -> Self {
        Self {
            body: Body::new(position, sprite, hit_points),
            role,
            speed,
            fire_timer: 0.0,
            last_shot: None,
            blink: Blink::default(),
        }
    }

    pub fn camp(&self) -> Camp {
        match self.role {
            ShipRole::Enemy => Camp::Enemy,
            ShipRole::Player(_) => Camp::Player,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    pub fn is_visible(&self) -> bool {
        !self.blink.hidden
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.remaining > 0.0
    }

    pub fn loadout(&self) -> Option<&PlayerLoadout> {
        match &self.role {
            ShipRole::Player(loadout) => Some(loadout),
            ShipRole::Enemy => None,
        }
    }

    pub fn loadout_mut(&mut self) -> Option<&mut PlayerLoadout> {
        match &mut self.role {
            ShipRole::Player(loadout) => Some(loadout),
            ShipRole::Enemy => None,
        }
    }

    pub fn last_shot(&self) -> Option<EntityId> {
        self.last_shot
    }

    /// Top-level advance; only the player's ship is advanced this way
    pub fn advance(&mut self, ctx: &mut TickContext, store: &mut EntityStore, dt: f64) {
        self.advance_blink(dt, ctx.config.blink.interval);
        if matches!(self.role, ShipRole::Player(_)) {
            self.control(ctx, store, dt);
        }
    }

    pub fn advance_blink(&mut self, dt: f64, interval: f64) {
        self.blink.advance(dt, interval);
    }

    fn has_live_shot(&self, ctx: &TickContext, store: &EntityStore) -> bool {
        self.last_shot.is_some_and(|id| ctx.is_alive(store, id))
    }

    /// Fire according to `mode`, staging projectiles for next tick
    pub fn shoot(&mut self, mode: FireMode, dt: f64, ctx: &mut TickContext, store: &EntityStore) {
        let firing = &ctx.config.firing;
        let (single_interval, multi_interval) = (firing.single_interval, firing.multi_interval);
        let (count, spacing) = (firing.multi_count, firing.multi_spacing);

        match mode {
            FireMode::Single => {
                if !self.has_live_shot(ctx, store) {
                    self.fire(&[0.0], false, ctx);
                }
            }
            FireMode::Multiple => {
                self.fire_timer += dt;
                if !self.has_live_shot(ctx, store) && self.fire_timer >= multi_interval {
                    let half_span = spacing * (count.saturating_sub(1)) as f64 / 2.0;
                    let offsets: Vec<f64> = (0..count).map(|i| i as f64 * spacing - half_span).collect();
                    self.fire(&offsets, false, ctx);
                    self.fire_timer = 0.0;
                }
            }
            FireMode::Timed | FireMode::TimedAlt => {
                self.fire_timer += dt;
                if self.fire_timer >= single_interval {
                    self.fire(&[0.0], mode == FireMode::TimedAlt, ctx);
                    self.fire_timer = 0.0;
                }
            }
        }
    }

    /// Stage one projectile per lateral offset from the ship's muzzle
    fn fire(&mut self, offsets: &[f64], alternate: bool, ctx: &mut TickContext) {
        let sprite = if alternate {
            Arc::clone(&ctx.sprites.missile_alt)
        } else {
            Arc::clone(&ctx.sprites.missile)
        };
        let camp = self.camp();
        let tuning = &ctx.config.projectile;
        let (hit_points, speed) = (tuning.hit_points, tuning.speed);

        let muzzle_x = self.body.position.x + (self.body.width() - sprite.width() as f64) / 2.0;
        let muzzle_y = match camp {
            Camp::Enemy => self.body.position.y + self.body.height(),
            _ => self.body.position.y - sprite.height() as f64,
        };

        for &offset in offsets {
            let position = Vector2D::new(muzzle_x + offset, muzzle_y);
            let projectile = Projectile::new(position, Arc::clone(&sprite), camp, hit_points, speed);
            self.last_shot = Some(ctx.spawn(Entity::Projectile(projectile)));
        }
        ctx.emit(GameEvent::ShotFired { camp });
    }

    /// Apply an impact of `pixels` overlapping pixels
    pub fn on_hit(&mut self, projectile: &mut Projectile, pixels: u32, ctx: &mut TickContext) {
        let damage = self.body.hit_points.min(projectile.body.hit_points);
        self.body.hit_points -= damage;
        projectile.absorb(pixels);

        let camp = self.camp();
        if self.is_alive() {
            let blink = &ctx.config.blink;
            self.blink.start(blink.duration, blink.interval);
            ctx.emit(GameEvent::ShipHit {
                camp,
                remaining: self.body.hit_points,
            });
            return;
        }

        ctx.emit(GameEvent::ShipDestroyed {
            camp,
            position: self.body.position,
        });
        if camp == Camp::Enemy {
            self.drop_pickup(ctx);
        }
    }

    fn drop_pickup(&self, ctx: &mut TickContext) {
        let roll: f64 = ctx.rng.random();
        let kind = if roll < ctx.config.pickup.extra_life_chance {
            PickupKind::ExtraLife
        } else {
            PickupKind::Coin
        };
        let sprite = match kind {
            PickupKind::ExtraLife => Arc::clone(&ctx.sprites.extra_life),
            PickupKind::Coin => Arc::clone(&ctx.sprites.coin),
        };
        let pickup = Pickup::new(kind, self.body.position, sprite, ctx.config.pickup.fall_speed);
        log::debug!("{kind:?} dropped at ({:.0}, {:.0})", self.body.position.x, self.body.position.y);
        ctx.spawn(Entity::Pickup(pickup));
        ctx.emit(GameEvent::PickupDropped { kind });
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        if self.is_visible() {
            self.body.draw(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::Harness;

    #[test]
    fn test_fire_mode_levels() {
        assert_eq!(FireMode::from_level(0), FireMode::Single);
        assert_eq!(FireMode::from_level(1), FireMode::Multiple);
        assert_eq!(FireMode::from_level(2), FireMode::Timed);
        assert_eq!(FireMode::from_level(3), FireMode::TimedAlt);
    }

    #[test]
    fn test_single_waits_for_previous_shot() {
        let mut h = Harness::new();
        let mut ship = h.enemy(Vector2D::new(100.0, 50.0), 1);

        h.shoot(&mut ship, FireMode::Single, 0.005);
        h.shoot(&mut ship, FireMode::Single, 0.005);
        assert_eq!(h.pending.len(), 1);

        // Kill the outstanding shot: the ship may fire again
        let id = ship.last_shot().unwrap();
        h.admit();
        if let Some(Entity::Projectile(p)) = h.store.get_mut(id) {
            p.body.hit_points = 0;
        }
        h.shoot(&mut ship, FireMode::Single, 0.005);
        assert_eq!(h.pending.len(), 1);
        assert_ne!(ship.last_shot(), Some(id));
    }

    #[test]
    fn test_enemy_shot_spawns_below_ship() {
        let mut h = Harness::new();
        let mut ship = h.enemy(Vector2D::new(100.0, 50.0), 1);
        h.shoot(&mut ship, FireMode::Single, 0.005);

        let (_, entity) = h.pending.iter().next().unwrap();
        let Entity::Projectile(shot) = entity else { panic!("expected projectile") };
        assert_eq!(shot.camp, Camp::Enemy);
        assert_eq!(shot.body.position.y, 50.0 + ship.body.height());
    }

    #[test]
    fn test_multiple_fires_pair_on_cadence() {
        let mut h = Harness::new();
        let mut ship = h.player_ship(Vector2D::new(200.0, 300.0));

        // Cadence not reached yet
        h.shoot(&mut ship, FireMode::Multiple, 0.3);
        assert_eq!(h.pending.len(), 0);

        h.shoot(&mut ship, FireMode::Multiple, 0.3);
        assert_eq!(h.pending.len(), 2);

        let xs: Vec<f64> = h
            .pending
            .iter()
            .map(|(_, e)| e.position().x)
            .collect();
        assert!((xs[1] - xs[0] - 30.0).abs() < 1e-9);

        // Timer reset and shots still alive: nothing more
        h.shoot(&mut ship, FireMode::Multiple, 0.6);
        assert_eq!(h.pending.len(), 2);
    }

    #[test]
    fn test_timed_ignores_outstanding_shot() {
        let mut h = Harness::new();
        let mut ship = h.player_ship(Vector2D::new(200.0, 300.0));

        for _ in 0..3 {
            h.shoot(&mut ship, FireMode::Timed, 0.2);
        }
        assert_eq!(h.pending.len(), 3);

        h.shoot(&mut ship, FireMode::TimedAlt, 0.2);
        let (_, last) = h.pending.iter().last().unwrap();
        let Entity::Projectile(shot) = last else { panic!("expected projectile") };
        assert!(Arc::ptr_eq(&shot.body.sprite, &h.sprites.missile_alt));
    }

    #[test]
    fn test_non_lethal_hit_blinks_then_recovers() {
        let mut h = Harness::new();
        let mut ship = h.enemy(Vector2D::new(100.0, 50.0), 3);
        let mut shot = h.projectile(Camp::Player, Vector2D::ZERO);

        h.hit(&mut ship, &mut shot, 4);
        assert_eq!(ship.body.hit_points, 2);
        assert_eq!(shot.body.hit_points, 1 - 4);
        assert!(ship.is_blinking());
        assert!(ship.is_visible());

        ship.advance_blink(0.1, 0.1);
        assert!(!ship.is_visible());
        ship.advance_blink(0.1, 0.1);
        assert!(ship.is_visible());

        for _ in 0..20 {
            ship.advance_blink(0.1, 0.1);
        }
        assert!(!ship.is_blinking());
        assert!(ship.is_visible());
    }

    #[test]
    fn test_lethal_hit_on_enemy_drops_pickup() {
        let mut h = Harness::new();
        let mut ship = h.enemy(Vector2D::new(100.0, 50.0), 1);
        let mut shot = h.projectile(Camp::Player, Vector2D::ZERO);

        h.hit(&mut ship, &mut shot, 2);
        assert!(!ship.is_alive());
        assert_eq!(h.pending.len(), 1);
        let (_, drop) = h.pending.iter().next().unwrap();
        assert!(matches!(drop, Entity::Pickup(_)));
        assert_eq!(drop.position(), Vector2D::new(100.0, 50.0));
    }

    #[test]
    fn test_lethal_hit_on_player_drops_nothing() {
        let mut h = Harness::new();
        let mut ship = h.player_ship(Vector2D::new(100.0, 300.0));
        ship.body.hit_points = 1;
        let mut shot = h.projectile(Camp::Enemy, Vector2D::ZERO);

        h.hit(&mut ship, &mut shot, 1);
        assert!(!ship.is_alive());
        assert!(h.pending.is_empty());
    }

    #[test]
    fn test_damage_capped_by_projectile_budget() {
        let mut h = Harness::new();
        let mut ship = h.enemy(Vector2D::new(100.0, 50.0), 10);
        let mut shot = h.projectile(Camp::Player, Vector2D::ZERO);
        shot.body.hit_points = 3;

        h.hit(&mut ship, &mut shot, 1);
        assert_eq!(ship.body.hit_points, 7);
        assert_eq!(shot.body.hit_points, 2);
    }
}
