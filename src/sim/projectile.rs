//! Projectiles
//!
//! A projectile's hit points are its damage budget: every pixel it overlaps
//! on impact is deducted, and it dies at zero.

use std::sync::Arc;

use super::body::Body;
use super::entity::TickContext;
use super::state::Camp;
use super::store::EntityStore;
use crate::sprite::Sprite;
use crate::vector::Vector2D;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub camp: Camp,
    /// Vertical speed (px/s)
    pub speed: f64,
}

impl Projectile {
    pub fn new(position: Vector2D, sprite: Arc<Sprite>, camp: Camp, hit_points: i32, speed: f64) -> Self {
        Self {
            body: Body::new(position, sprite, hit_points),
            camp,
            speed,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    /// Lose `pixels` hit points after hitting something
    #[inline]
    pub fn absorb(&mut self, pixels: u32) {
        self.body.hit_points -= pixels as i32;
    }

    /// Move one step, then collide with every other live entity
    pub fn advance(&mut self, ctx: &mut TickContext, store: &mut EntityStore, dt: f64) {
        let y = self.body.position.y;
        if y <= 0.0 || y >= ctx.config.play_height {
            self.body.hit_points = 0;
            return;
        }

        self.body.position.y += dt * self.speed * self.camp.projectile_direction();

        if self.camp == Camp::Enemy && self.body.position.y > ctx.expiry_line() {
            self.body.hit_points = 0;
            return;
        }

        for (_, victim) in store.iter_mut() {
            if !victim.is_alive() {
                continue;
            }
            victim.collide(self, ctx);
            if !self.is_alive() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::Harness;

    #[test]
    fn test_enemy_projectile_moves_down() {
        let mut h = Harness::new();
        let mut shot = h.projectile(Camp::Enemy, Vector2D::new(40.0, 50.0));
        let mut last_y = shot.body.position.y;
        for _ in 0..20 {
            h.advance_projectile(&mut shot, 0.005);
            assert!(shot.is_alive());
            assert!(shot.body.position.y > last_y);
            last_y = shot.body.position.y;
        }
    }

    #[test]
    fn test_player_projectile_moves_up_and_leaves_top() {
        let mut h = Harness::new();
        let mut shot = h.projectile(Camp::Player, Vector2D::new(40.0, 30.0));
        let mut last_y = shot.body.position.y;
        while shot.is_alive() {
            h.advance_projectile(&mut shot, 0.005);
            if shot.is_alive() {
                assert!(shot.body.position.y < last_y);
                last_y = shot.body.position.y;
            }
        }
        assert!(last_y <= 0.0);
    }

    #[test]
    fn test_enemy_projectile_expires_below_player() {
        let mut h = Harness::new();
        h.player_line = 100.0;
        let mut shot = h.projectile(Camp::Enemy, Vector2D::new(40.0, 118.0));
        h.advance_projectile(&mut shot, 0.01);
        assert!(!shot.is_alive());
    }

    #[test]
    fn test_projectiles_of_opposite_camps_cancel() {
        let mut h = Harness::new();
        let enemy_shot = h.projectile(Camp::Enemy, Vector2D::new(40.0, 100.0));
        let enemy_id = h.add(crate::sim::entity::Entity::Projectile(enemy_shot));

        let mut player_shot = h.projectile(Camp::Player, Vector2D::new(40.0, 101.0));
        h.advance_projectile(&mut player_shot, 0.0);

        assert!(!player_shot.is_alive());
        assert!(!h.store.get(enemy_id).unwrap().is_alive());
    }
}
