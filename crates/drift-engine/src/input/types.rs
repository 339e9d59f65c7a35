use crate::coords::Vec2;

/// Platform-agnostic pointer events, positions in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),

    /// Pointer left the surface.
    Left,
}
