use super::{Rect, Vec2};

/// Viewport size in logical pixels.
///
/// Read once when a field mounts; re-applied only through an explicit resize.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn min_dimension(self) -> f32 {
        self.width.min(self.height)
    }

    /// The band elements may occupy: the viewport grown by `margin` on every side.
    #[inline]
    pub fn wrap_bounds(self, margin: f32) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height).expanded(margin)
    }
}
