use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    /// Grows the rectangle by `margin` on every side. Negative margins shrink it.
    #[inline]
    pub fn expanded(self, margin: f32) -> Self {
        Rect::new(
            self.origin.x - margin,
            self.origin.y - margin,
            self.size.x + 2.0 * margin,
            self.size.y + 2.0 * margin,
        )
    }

    /// Closed containment: `[min, max]` on both axes.
    #[inline]
    pub fn contains_closed(self, p: Vec2) -> bool {
        let (lo, hi) = (self.min(), self.max());
        p.x >= lo.x && p.y >= lo.y && p.x <= hi.x && p.y <= hi.y
    }

    /// Toroidal wrap of a single point.
    ///
    /// A coordinate past one edge is moved onto the opposite edge; coordinates
    /// inside the rectangle are returned unchanged.
    #[inline]
    pub fn wrap(self, p: Vec2) -> Vec2 {
        let (lo, hi) = (self.min(), self.max());
        let x = if p.x < lo.x {
            hi.x
        } else if p.x > hi.x {
            lo.x
        } else {
            p.x
        };
        let y = if p.y < lo.y {
            hi.y
        } else if p.y > hi.y {
            lo.y
        } else {
            p.y
        };
        Vec2::new(x, y)
    }
}
