//! Enemy formations
//!
//! A formation owns its member ships outright; they are not registered in the
//! entity store. The whole block sweeps sideways in lock-step, steps down on
//! each edge contact and gets faster and more trigger-happy every time.
//!
//! The bounding box always encloses exactly the live members. Motion moves the
//! box and every member by the same delta, so the two never drift apart.

use std::sync::Arc;

use rand::Rng;

use super::entity::TickContext;
use super::projectile::Projectile;
use super::ship::{FireMode, Ship};
use super::state::{Camp, FormationSnapshot};
use super::store::EntityStore;
use crate::render::RenderTarget;
use crate::settings::FormationTuning;
use crate::sprite::Sprite;
use crate::vector::Vector2D;

#[derive(Debug, Clone)]
pub struct Formation {
    ships: Vec<Ship>,
    /// Width every row is laid out across
    base_width: f64,
    /// Top-left of the bounding box
    position: Vector2D,
    width: f64,
    height: f64,
    speed: f64,
    /// +1 sweeping right, -1 sweeping left
    direction: f64,
    /// Set while touching an edge so one contact descends once
    descending: bool,
    /// Expected shots per member per second
    fire_probability: f64,
    tuning: FormationTuning,
}

impl Formation {
    pub fn new(position: Vector2D, base_width: f64, speed: f64, tuning: &FormationTuning) -> Self {
        Self {
            ships: Vec::new(),
            base_width,
            position,
            width: 0.0,
            height: 0.0,
            speed,
            direction: 1.0,
            descending: false,
            fire_probability: tuning.initial_fire_probability,
            tuning: tuning.clone(),
        }
    }

    /// Lay out a row of `count` ships evenly across the base width
    ///
    /// The row goes below the current lowest row, or at the top of an empty
    /// formation. `count` must be at least 2.
    pub fn add_line(&mut self, count: usize, hit_points: i32, sprite: &Arc<Sprite>) {
        debug_assert!(count >= 2, "a formation row needs at least 2 ships, got {count}");

        let ship_width = sprite.width() as f64;
        let gap = (self.base_width - count as f64 * ship_width) / (count.saturating_sub(1).max(1)) as f64;
        let y = if self.ships.is_empty() {
            self.position.y
        } else {
            self.bottom() + self.tuning.row_gap
        };

        for i in 0..count {
            let x = self.position.x + i as f64 * (ship_width + gap);
            self.ships
                .push(Ship::enemy(Vector2D::new(x, y), Arc::clone(sprite), hit_points));
        }
        self.recompute_bounds();
    }

    /// Shrink or grow the box to the live members; empty means zero size
    pub fn recompute_bounds(&mut self) {
        let mut members = self.ships.iter().filter(|s| s.is_alive());
        let Some(first) = members.next() else {
            self.width = 0.0;
            self.height = 0.0;
            return;
        };

        let mut min = first.body.position;
        let mut max = Vector2D::new(
            first.body.position.x + first.body.width(),
            first.body.position.y + first.body.height(),
        );
        for ship in members {
            let p = ship.body.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x + ship.body.width());
            max.y = max.y.max(p.y + ship.body.height());
        }

        self.position = min;
        self.width = max.x - min.x;
        self.height = max.y - min.y;
    }

    pub fn advance(&mut self, ctx: &mut TickContext, store: &mut EntityStore, dt: f64) {
        let chance = self.fire_probability * dt;
        let blink_interval = ctx.config.blink.interval;

        for ship in self.ships.iter_mut().filter(|s| s.is_alive()) {
            if ctx.rng.random::<f64>() < chance {
                ship.shoot(FireMode::Single, dt, ctx, store);
            }
            ship.advance_blink(dt, blink_interval);
        }

        self.advance_motion(dt, ctx.config.play_width);
    }

    /// Sweep sideways and handle edge contact
    pub fn advance_motion(&mut self, dt: f64, play_width: f64) {
        self.translate(self.speed * self.direction * dt, 0.0);

        let touching_left = self.position.x <= 0.0;
        let touching_right = self.position.x + self.width > play_width;
        if !(touching_left || touching_right) {
            self.descending = false;
            return;
        }

        self.direction = if touching_left { 1.0 } else { -1.0 };
        if !self.descending {
            self.descending = true;
            self.translate(0.0, self.tuning.descent_step);
            self.fire_probability += self.tuning.fire_probability_increment;
            self.speed = (self.speed + self.tuning.speed_increment).min(self.tuning.max_speed);
            log::debug!(
                "formation reached {} edge, speed {:.0}",
                if touching_left { "left" } else { "right" },
                self.speed
            );
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let delta = Vector2D::new(dx, dy);
        self.position = self.position + delta;
        for ship in &mut self.ships {
            ship.body.position = ship.body.position + delta;
        }
    }

    /// Offer the projectile to each live member until it is spent
    pub fn collide(&mut self, projectile: &mut Projectile, ctx: &mut TickContext) {
        if projectile.camp == Camp::Enemy {
            return;
        }

        let rule = ctx.config.solid_rule;
        for ship in self.ships.iter_mut() {
            if !ship.is_alive() {
                continue;
            }
            if let Some(pixels) = ship.body.hit_test(Camp::Enemy, projectile, rule) {
                ship.on_hit(projectile, pixels, ctx);
            }
            if !projectile.is_alive() {
                break;
            }
        }

        let before = self.ships.len();
        self.ships.retain(Ship::is_alive);
        if self.ships.len() != before {
            self.recompute_bounds();
        }
    }

    pub fn is_alive(&self) -> bool {
        self.ships.iter().any(Ship::is_alive)
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        for ship in &self.ships {
            ship.draw(target);
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2D {
        self.position
    }

    #[inline]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Lower edge of the bounding box
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.position.y + self.height
    }

    pub fn members(&self) -> &[Ship] {
        &self.ships
    }

    pub fn members_mut(&mut self) -> &mut [Ship] {
        &mut self.ships
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn fire_probability(&self) -> f64 {
        self.fire_probability
    }

    pub fn snapshot(&self) -> FormationSnapshot {
        FormationSnapshot {
            x: self.position.x,
            y: self.position.y,
            width: self.width,
            height: self.height,
            members: self.ships.iter().filter(|s| s.is_alive()).count(),
            speed: self.speed,
            direction: self.direction,
        }
    }
}
