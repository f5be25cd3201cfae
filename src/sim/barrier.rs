//! Destructible bunkers
//!
//! A bunker never loses hit points. Each hit erases the overlapping pixels
//! from its own sprite and drains the projectile by the same count.

use std::sync::Arc;

use super::body::Body;
use super::entity::TickContext;
use super::projectile::Projectile;
use super::state::{Camp, GameEvent};
use crate::sprite::Sprite;
use crate::vector::Vector2D;

#[derive(Debug, Clone)]
pub struct Barrier {
    pub body: Body,
}

impl Barrier {
    pub fn new(position: Vector2D, sprite: Arc<Sprite>, hit_points: i32) -> Self {
        Self {
            body: Body::new(position, sprite, hit_points),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    pub fn collide(&mut self, projectile: &mut Projectile, ctx: &mut TickContext) {
        if let Some(pixels) = self.body.hit_test(Camp::Neutral, projectile, ctx.config.solid_rule) {
            projectile.absorb(pixels);
            ctx.emit(GameEvent::BarrierHit { pixels });
        }
    }
}
