//! Collision detection at pixel granularity
//!
//! Two stages: a strict axis-aligned rectangle test, then a scan of the
//! overlapping region counting coordinates where both sprites are solid.
//! The count doubles as the damage dealt, and destructible victims lose the
//! counted pixels.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sprite::{Rgba, Sprite};
use crate::vector::Vector2D;

/// Integer screen rectangle; positions truncate toward zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Bounds of a sprite drawn at `pos`
    pub fn of_sprite(pos: Vector2D, sprite: &Sprite) -> Self {
        Self::new(pos.x as i32, pos.y as i32, sprite.width() as i32, sprite.height() as i32)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Overlapping region, `None` when the rectangles do not overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !rectangles_overlap(self, other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Strict overlap: rectangles that only share an edge do not overlap
pub fn rectangles_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.right() <= b.x || a.bottom() <= b.y || b.right() <= a.x || b.bottom() <= a.y)
}

/// Which victim pixels count as solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolidRule {
    /// Only fully opaque white, dark red, black and tan pixels
    #[default]
    Palette,
    /// Any pixel with non-zero alpha
    Opaque,
}

const SOLID_PALETTE: [Rgba; 4] = [Rgba::WHITE, Rgba::DARK_RED, Rgba::BLACK, Rgba::TAN];

impl SolidRule {
    #[inline]
    pub fn is_solid(&self, pixel: Rgba) -> bool {
        match self {
            SolidRule::Palette => SOLID_PALETTE.contains(&pixel),
            SolidRule::Opaque => !pixel.is_transparent(),
        }
    }
}

/// Count coordinates where the victim is solid and the attacker is opaque
///
/// When `erode` is set every counted victim pixel is cleared. The victim
/// sprite is only copied (copy-on-write) when a pixel actually changes.
pub fn pixel_overlap_count(
    victim_pos: Vector2D,
    victim: &mut Arc<Sprite>,
    attacker_pos: Vector2D,
    attacker: &Sprite,
    erode: bool,
    rule: SolidRule,
) -> u32 {
    let victim_rect = Rect::of_sprite(victim_pos, victim);
    let attacker_rect = Rect::of_sprite(attacker_pos, attacker);
    let Some(overlap) = victim_rect.intersection(&attacker_rect) else {
        return 0;
    };

    let mut hits = Vec::new();
    for y in overlap.y..overlap.bottom() {
        for x in overlap.x..overlap.right() {
            let vx = (x - victim_rect.x) as u32;
            let vy = (y - victim_rect.y) as u32;
            let ax = (x - attacker_rect.x) as u32;
            let ay = (y - attacker_rect.y) as u32;

            if rule.is_solid(victim.pixel(vx, vy)) && !attacker.pixel(ax, ay).is_transparent() {
                hits.push((vx, vy));
            }
        }
    }

    if erode && !hits.is_empty() {
        let sprite = Arc::make_mut(victim);
        for &(x, y) in &hits {
            sprite.clear_pixel(x, y);
        }
    }

    hits.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn block(w: u32, h: u32, color: Rgba) -> Arc<Sprite> {
        Arc::new(Sprite::filled(w, h, color).unwrap())
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        let below = Rect::new(0, 10, 10, 10);
        assert!(!rectangles_overlap(&a, &right));
        assert!(!rectangles_overlap(&a, &below));
        assert!(rectangles_overlap(&a, &Rect::new(9, 9, 10, 10)));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 7, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 7, 5, 3)));
        assert_eq!(a.intersection(&Rect::new(20, 20, 1, 1)), None);
    }

    #[test]
    fn test_rect_truncates_position() {
        let sprite = Sprite::filled(4, 4, Rgba::WHITE).unwrap();
        let rect = Rect::of_sprite(Vector2D::new(3.9, -0.5), &sprite);
        assert_eq!(rect, Rect::new(3, 0, 4, 4));
    }

    #[test]
    fn test_palette_rule() {
        assert!(SolidRule::Palette.is_solid(Rgba::TAN));
        assert!(SolidRule::Palette.is_solid(Rgba::DARK_RED));
        assert!(!SolidRule::Palette.is_solid(Rgba::opaque(10, 10, 10)));
        assert!(!SolidRule::Palette.is_solid(Rgba::new(255, 255, 255, 128)));
        assert!(SolidRule::Opaque.is_solid(Rgba::opaque(10, 10, 10)));
        assert!(!SolidRule::Opaque.is_solid(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_overlap_count_and_erosion() {
        let mut victim = block(10, 10, Rgba::WHITE);
        let attacker = Sprite::filled(2, 4, Rgba::opaque(255, 221, 0)).unwrap();

        // Attacker pokes 2 rows into the victim's bottom edge
        let count = pixel_overlap_count(
            Vector2D::new(0.0, 0.0),
            &mut victim,
            Vector2D::new(4.0, 8.0),
            &attacker,
            true,
            SolidRule::Palette,
        );
        assert_eq!(count, 4);
        assert_eq!(victim.opaque_count(), 96);
        assert!(victim.pixel(4, 9).is_transparent());

        // Same spot again: nothing solid left there
        let again = pixel_overlap_count(
            Vector2D::new(0.0, 0.0),
            &mut victim,
            Vector2D::new(4.0, 8.0),
            &attacker,
            true,
            SolidRule::Palette,
        );
        assert_eq!(again, 0);
    }

    #[test]
    fn test_no_erosion_leaves_shared_sprite_untouched() {
        let shared = block(6, 6, Rgba::BLACK);
        let mut victim = Arc::clone(&shared);
        let attacker = Sprite::filled(6, 6, Rgba::WHITE).unwrap();

        let count = pixel_overlap_count(
            Vector2D::ZERO,
            &mut victim,
            Vector2D::ZERO,
            &attacker,
            false,
            SolidRule::Palette,
        );
        assert_eq!(count, 36);
        assert!(Arc::ptr_eq(&shared, &victim));
    }

    #[test]
    fn test_erosion_copies_shared_sprite() {
        let shared = block(6, 6, Rgba::BLACK);
        let mut victim = Arc::clone(&shared);
        let attacker = Sprite::filled(1, 1, Rgba::WHITE).unwrap();

        pixel_overlap_count(
            Vector2D::ZERO,
            &mut victim,
            Vector2D::ZERO,
            &attacker,
            true,
            SolidRule::Palette,
        );
        assert_eq!(shared.opaque_count(), 36);
        assert_eq!(victim.opaque_count(), 35);
    }

    #[test]
    fn test_transparent_attacker_pixels_do_not_count() {
        let mut victim = block(4, 4, Rgba::WHITE);
        let attacker = Sprite::filled(4, 4, Rgba::TRANSPARENT).unwrap();
        let count = pixel_overlap_count(
            Vector2D::ZERO,
            &mut victim,
            Vector2D::ZERO,
            &attacker,
            true,
            SolidRule::Palette,
        );
        assert_eq!(count, 0);
    }

    proptest! {
        #[test]
        fn prop_edge_sharing_never_overlaps(
            x in -500i32..500, y in -500i32..500,
            w in 1i32..100, h in 1i32..100,
            w2 in 1i32..100, h2 in 1i32..100, offset in -50i32..50,
        ) {
            let a = Rect::new(x, y, w, h);
            prop_assert!(!rectangles_overlap(&a, &Rect::new(a.right(), y + offset, w2, h2)));
            prop_assert!(!rectangles_overlap(&a, &Rect::new(x + offset, a.bottom(), w2, h2)));
            prop_assert!(!rectangles_overlap(&a, &Rect::new(x - w2, y + offset, w2, h2)));
            prop_assert!(!rectangles_overlap(&a, &Rect::new(x + offset, y - h2, w2, h2)));
        }

        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100i32..100, ay in -100i32..100, aw in 1i32..50, ah in 1i32..50,
            bx in -100i32..100, by in -100i32..100, bw in 1i32..50, bh in 1i32..50,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(rectangles_overlap(&a, &b), rectangles_overlap(&b, &a));
        }

        #[test]
        fn prop_disjoint_sprites_count_zero(
            gap in 0.0f64..200.0, dy in -30.0f64..30.0,
            w in 1u32..20, h in 1u32..20,
        ) {
            let mut victim = block(w, h, Rgba::WHITE);
            let attacker = Sprite::filled(w, h, Rgba::WHITE).unwrap();
            let attacker_pos = Vector2D::new(w as f64 + gap, dy);
            let count = pixel_overlap_count(
                Vector2D::ZERO,
                &mut victim,
                attacker_pos,
                &attacker,
                true,
                SolidRule::Opaque,
            );
            prop_assert_eq!(count, 0);
            prop_assert_eq!(victim.opaque_count(), (w * h) as usize);
        }
    }
}
