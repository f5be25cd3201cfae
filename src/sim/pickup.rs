//! Falling rewards dropped by destroyed enemies

use std::sync::Arc;

use super::body::Body;
use super::entity::{Entity, TickContext};
use super::state::{GameEvent, PickupKind};
use super::store::EntityStore;
use crate::sprite::Sprite;
use crate::vector::Vector2D;

#[derive(Debug, Clone)]
pub struct Pickup {
    pub body: Body,
    pub kind: PickupKind,
    /// Vertical speed (px/s)
    pub fall_speed: f64,
}

impl Pickup {
    pub fn new(kind: PickupKind, position: Vector2D, sprite: Arc<Sprite>, fall_speed: f64) -> Self {
        Self {
            body: Body::new(position, sprite, 1),
            kind,
            fall_speed,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    /// Fall, expire below the player, or apply the effect on contact
    pub fn advance(&mut self, ctx: &mut TickContext, store: &mut EntityStore, dt: f64) {
        self.body.position.y += self.fall_speed * dt;
        if self.body.position.y > ctx.expiry_line() {
            self.body.hit_points = 0;
        }

        let Some(Entity::Ship(player)) = store.get_mut(ctx.player) else {
            return;
        };
        if !player.is_alive() || !self.body.overlaps(&player.body) {
            return;
        }

        self.body.hit_points = 0;
        match self.kind {
            PickupKind::Coin => {
                if let Some(loadout) = player.loadout_mut() {
                    loadout.currency = loadout.currency.saturating_add(ctx.config.pickup.coin_value);
                }
            }
            PickupKind::ExtraLife => player.body.hit_points += 1,
        }
        log::debug!("{:?} collected", self.kind);
        ctx.emit(GameEvent::PickupCollected { kind: self.kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::Harness;

    #[test]
    fn test_falls_and_expires_below_player() {
        let mut h = Harness::new();
        h.player_line = 100.0;
        let mut pickup = h.pickup(PickupKind::Coin, Vector2D::new(0.0, 60.0));

        h.advance_pickup(&mut pickup, 0.1);
        assert_eq!(pickup.body.position.y, 70.0);
        assert!(pickup.is_alive());

        for _ in 0..6 {
            h.advance_pickup(&mut pickup, 0.1);
        }
        assert!(!pickup.is_alive());
    }

    #[test]
    fn test_coin_adds_currency() {
        let mut h = Harness::new();
        let player_pos = h.spawn_player();
        let mut pickup = h.pickup(PickupKind::Coin, player_pos + Vector2D::new(2.0, -4.0));

        h.advance_pickup(&mut pickup, 0.005);
        assert!(!pickup.is_alive());
        let player = h.player().unwrap();
        assert_eq!(player.loadout().unwrap().currency, 100);
        assert!(h.events.contains(&GameEvent::PickupCollected { kind: PickupKind::Coin }));
    }

    #[test]
    fn test_extra_life_adds_hit_point() {
        let mut h = Harness::new();
        let player_pos = h.spawn_player();
        let mut pickup = h.pickup(PickupKind::ExtraLife, player_pos + Vector2D::new(2.0, -4.0));

        h.advance_pickup(&mut pickup, 0.005);
        assert!(!pickup.is_alive());
        assert_eq!(h.player().unwrap().body.hit_points, 4);
    }

    #[test]
    fn test_dead_player_collects_nothing() {
        let mut h = Harness::new();
        let player_pos = h.spawn_player();
        let player = h.player;
        h.store.get_mut(player).and_then(Entity::as_ship_mut).unwrap().body.hit_points = 0;
        let mut pickup = h.pickup(PickupKind::ExtraLife, player_pos + Vector2D::new(2.0, -4.0));

        h.advance_pickup(&mut pickup, 0.005);
        assert!(pickup.is_alive());
        assert_eq!(h.player().unwrap().body.hit_points, 0);
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_miss_leaves_player_untouched() {
        let mut h = Harness::new();
        let player_pos = h.spawn_player();
        let mut pickup = h.pickup(PickupKind::ExtraLife, player_pos + Vector2D::new(100.0, -50.0));

        h.advance_pickup(&mut pickup, 0.005);
        assert!(pickup.is_alive());
        assert_eq!(h.player().unwrap().body.hit_points, 3);
    }
}
