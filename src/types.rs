// Core value types shared by the rasterizer, the stroke tracker and the canvas.

use crate::error::{PaintError, Result};
use std::fmt;

/// Pointer offsets further than this from the origin are pinned to it, which
/// bounds the length of any single stroke segment.
pub const MAX_OFFSET: i32 = 1 << 20;

/// Integer pixel coordinate, relative to the canvas' top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Canvas-local coordinates from a raw (fractional) pointer offset.
    /// The offset is floored, so (3.9, -0.2) lands on pixel (3, -1), then
    /// clamped to ±[`MAX_OFFSET`]. NaN lands on 0.
    pub fn from_offset(x: f32, y: f32) -> Self {
        let axis = |v: f32| v.floor().clamp(-(MAX_OFFSET as f32), MAX_OFFSET as f32) as i32;
        Self { x: axis(x), y: axis(y) }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Straight (non-premultiplied) RGBA fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse any CSS color string: named colors, `#rgb`, `#rrggbb`, `rgb()`, `hsl()`...
    pub fn parse(css: &str) -> Result<Self> {
        let parsed = csscolorparser::parse(css.trim())
            .map_err(|e| PaintError::InvalidColor(format!("{css:?}: {e}")))?;
        let [r, g, b, a] = parsed.to_rgba8();
        Ok(Self { r, g, b, a })
    }

    /// Pack as 0x00RRGGBB (the window's pixel format). Alpha is dropped.
    #[inline]
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub fn from_u32(px: u32) -> Self {
        Self::rgb((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }
}

impl std::str::FromStr for Color {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Opaque pixel grid the window can display directly.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // pixels per row
    pub height: usize,    // rows
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color.to_u32(); width * height],
        }
    }

    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_u32(self.pixels[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_floored() {
        assert_eq!(Point::from_offset(3.9, 0.0), Point::new(3, 0));
        assert_eq!(Point::from_offset(-0.2, 12.5), Point::new(-1, 12));
    }

    #[test]
    fn far_offsets_are_pinned() {
        assert_eq!(Point::from_offset(-3.0e9, 3.0e9), Point::new(-MAX_OFFSET, MAX_OFFSET));
        assert_eq!(Point::from_offset(f32::INFINITY, f32::NAN), Point::new(MAX_OFFSET, 0));
    }

    #[test]
    fn parses_css_colors() {
        assert_eq!(Color::parse("black").unwrap(), Color::BLACK);
        assert_eq!(Color::parse("#ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::parse(" white ").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("rgba(0, 0, 255, 0)").unwrap().a, 0);
        assert!(matches!(
            Color::parse("not-a-color"),
            Err(PaintError::InvalidColor(_))
        ));
    }

    #[test]
    fn packs_to_window_format() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_u32(), 0x0012_3456);
        assert_eq!(Color::from_u32(0x00AB_CDEF), Color::rgb(0xAB, 0xCD, 0xEF));
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
    }

    #[test]
    fn index_rejects_out_of_bounds() {
        let fb = FrameBuffer::filled(4, 3, Color::WHITE);
        assert_eq!(fb.index(3, 2), Some(11));
        assert_eq!(fb.index(4, 0), None);
        assert_eq!(fb.index(0, -1), None);
    }
}
