use std::fmt;

use crate::paint::Tint;

/// Outline of a sprite.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SpriteShape {
    Disc,
    Square,
    /// Circle outline.
    Ring,
    /// Square outline.
    Frame,
}

/// Everything a surface needs to create the renderable for one element.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteSpec {
    /// Edge length (diameter for round shapes) in logical pixels.
    pub size: f32,
    pub shape: SpriteShape,
    pub tint: Tint,
}

/// Presentation state pushed onto a handle once per accepted frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ElementTransform {
    /// Centre, logical pixels.
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Degrees.
    pub rotation: f32,
    pub opacity: f32,
}

/// A visual handle the simulation can move around.
pub trait Renderable {
    /// False once the backing view is gone or not yet attached.
    fn is_live(&self) -> bool;

    fn set_transform(&mut self, transform: &ElementTransform);
}

/// Creates and destroys renderables.
///
/// Handles are owned by the registry that attached them and are handed back
/// through [`Surface::detach`] exactly once.
pub trait Surface {
    type Handle: Renderable;

    fn attach(&mut self, spec: &SpriteSpec) -> Result<Self::Handle, SurfaceError>;

    fn detach(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The surface cannot hold more renderables.
    Full { capacity: usize },
    /// The surface is not attached to anything that can display it.
    Unavailable(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Full { capacity } => {
                write!(f, "surface is full ({capacity} sprites)")
            }
            SurfaceError::Unavailable(why) => write!(f, "surface unavailable: {why}"),
        }
    }
}

impl std::error::Error for SurfaceError {}
