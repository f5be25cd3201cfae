//! Mutable RGBA sprites
//!
//! The image surface the simulation collides against. Hosts decode their own
//! image files and hand over RGBA8 buffers; the simulation only reads sizes,
//! reads pixels, and clears pixels when terrain erodes.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    #[error("sprite buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("sprite art row {row} is {len} wide, expected {expected}")]
    RaggedArt { row: usize, len: usize, expected: usize },
    #[error("sprite art uses glyph {0:?} which has no colour in the legend")]
    UnknownGlyph(char),
    #[error("sprite must be at least 1x1")]
    Empty,
}

/// One RGBA8 pixel, laid out to match raw image buffers
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const DARK_RED: Self = Self::opaque(136, 0, 21);
    pub const TAN: Self = Self::opaque(213, 159, 128);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// A width × height grid of pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Sprite {
    /// A sprite filled with a single colour
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self, SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::Empty);
        }
        Ok(Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        })
    }

    /// Wrap a decoded RGBA8 buffer
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(SpriteError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let pixels: &[Rgba] = bytemuck::cast_slice(bytes);
        Ok(Self {
            width,
            height,
            pixels: pixels.to_vec(),
        })
    }

    /// Build a sprite from character art, one string per row
    ///
    /// `.` and space are always transparent; every other glyph must appear in
    /// the legend.
    pub fn from_art(rows: &[&str], legend: &[(char, Rgba)]) -> Result<Self, SpriteError> {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(SpriteError::Empty);
        }

        let mut pixels = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(SpriteError::RaggedArt { row, len, expected: width });
            }
            for glyph in line.chars() {
                let color = match glyph {
                    '.' | ' ' => Rgba::TRANSPARENT,
                    _ => legend
                        .iter()
                        .find(|(g, _)| *g == glyph)
                        .map(|(_, c)| *c)
                        .ok_or(SpriteError::UnknownGlyph(glyph))?,
                };
                pixels.push(color);
            }
        }

        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y); panics outside the sprite
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Erase a pixel to fully transparent
    #[inline]
    pub fn clear_pixel(&mut self, x: u32, y: u32) {
        self.set_pixel(x, y, Rgba::TRANSPARENT);
    }

    /// Number of pixels with any opacity
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_transparent()).count()
    }

    /// Raw RGBA8 bytes, e.g. for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside sprite");
        (y * self.width + x) as usize
    }
}
