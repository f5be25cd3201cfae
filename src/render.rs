//! Drawing interface the simulation renders through
//!
//! The simulation never owns a surface. Hosts implement [`RenderTarget`] over
//! whatever backend they have; [`FrameRecorder`] captures draw calls for the
//! headless binary and for tests.

use std::sync::Arc;

use crate::sprite::Sprite;
use crate::vector::Vector2D;

pub trait RenderTarget {
    /// Draw a sprite with its top-left corner at `position`
    fn draw_sprite(&mut self, sprite: &Arc<Sprite>, position: Vector2D);

    /// Draw text with its top-left corner at `position`
    fn draw_text(&mut self, text: &str, position: Vector2D, size: f32);

    /// Extents (width, height) `text` would occupy at `size`
    fn measure_text(&self, text: &str, size: f32) -> (f64, f64);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        position: Vector2D,
        width: u32,
        height: u32,
    },
    Text {
        text: String,
        position: Vector2D,
        size: f32,
    },
}

/// Render target that records draw calls instead of drawing
///
/// Text is measured as if set in a monospace font whose glyphs are
/// `advance` × size wide and whose lines are `line_height` × size tall.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
    advance: f64,
    line_height: f64,
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            advance: 0.5,
            line_height: 1.2,
        }
    }
}

impl FrameRecorder {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            DrawCommand::Sprite { .. } => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderTarget for FrameRecorder {
    fn draw_sprite(&mut self, sprite: &Arc<Sprite>, position: Vector2D) {
        self.commands.push(DrawCommand::Sprite {
            position,
            width: sprite.width(),
            height: sprite.height(),
        });
    }

    fn draw_text(&mut self, text: &str, position: Vector2D, size: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
            size,
        });
    }

    fn measure_text(&self, text: &str, size: f32) -> (f64, f64) {
        let size = size as f64;
        let columns = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        let rows = text.lines().count().max(1);
        (
            columns as f64 * self.advance * size,
            rows as f64 * self.line_height * size,
        )
    }
}
