use crate::coords::{Vec2, Viewport};

/// Last committed pointer sample.
///
/// A plain `Copy` value: writers replace it whole, so a reader never sees an
/// `x` from one event paired with a `y` from another.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerState {
    pub position: Vec2,

    /// False until the first committed move, and again after the pointer idles
    /// or leaves. Physics skips repulsion entirely while false.
    pub interacting: bool,
}

impl PointerState {
    /// Resting state: centre of the viewport, not interacting.
    pub fn centered(viewport: Viewport) -> Self {
        Self {
            position: viewport.center(),
            interacting: false,
        }
    }

    pub fn at(position: Vec2) -> Self {
        Self { position, interacting: true }
    }

    pub fn idle(self) -> Self {
        Self { interacting: false, ..self }
    }
}
