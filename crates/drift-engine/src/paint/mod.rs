//! Paint model for sprites.
//!
//! Colors are linear premultiplied alpha. A sprite is filled with a horizontal
//! two-stop [`Tint`]; per-frame opacity is applied on top by the renderer.

mod color;

pub use color::Color;

/// Two-stop horizontal fill, left edge to right edge of the sprite.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tint {
    pub start: Color,
    pub end: Color,
}

impl Tint {
    #[inline]
    pub const fn solid(color: Color) -> Self {
        Self { start: color, end: color }
    }

    #[inline]
    pub const fn gradient(start: Color, end: Color) -> Self {
        Self { start, end }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::solid(Color::from_premul(1.0, 1.0, 1.0, 1.0))
    }
}
