//! Positioned sprite with hit points
//!
//! Shared by every sprite-backed entity. Implements the common half of the
//! collision protocol: camp filter, rectangle test, pixel count.

use std::sync::Arc;

use super::collision::{Rect, SolidRule, pixel_overlap_count, rectangles_overlap};
use super::projectile::Projectile;
use super::state::Camp;
use crate::render::RenderTarget;
use crate::sprite::Sprite;
use crate::vector::Vector2D;

#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vector2D,
    pub sprite: Arc<Sprite>,
    pub hit_points: i32,
}

impl Body {
    pub fn new(position: Vector2D, sprite: Arc<Sprite>, hit_points: i32) -> Self {
        Self {
            position,
            sprite,
            hit_points,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.sprite.width() as f64
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.sprite.height() as f64
    }

    pub fn rect(&self) -> Rect {
        Rect::of_sprite(self.position, &self.sprite)
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        rectangles_overlap(&self.rect(), &other.rect())
    }

    /// Pixel-overlap count of `projectile` against this body, if it hits
    ///
    /// Same-camp projectiles are ignored. Returns `None` unless at least one
    /// pixel collides; eroding camps lose the counted pixels.
    pub fn hit_test(&mut self, camp: Camp, projectile: &Projectile, rule: SolidRule) -> Option<u32> {
        if camp == projectile.camp {
            return None;
        }
        if !self.overlaps(&projectile.body) {
            return None;
        }

        let count = pixel_overlap_count(
            self.position,
            &mut self.sprite,
            projectile.body.position,
            &projectile.body.sprite,
            camp.erodes(),
            rule,
        );
        (count > 0).then_some(count)
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        target.draw_sprite(&self.sprite, self.position);
    }
}
