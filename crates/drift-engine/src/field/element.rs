use crate::coords::Vec2;
use crate::host::{ElementTransform, Renderable};

/// Kinematic state touched by the physics step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Body {
    /// Centre, logical pixels.
    pub position: Vec2,
    /// Pixels per accepted frame.
    pub velocity: Vec2,
    /// Scale the element relaxes back to once the pointer leaves it alone.
    pub base_scale: f32,
    pub scale: f32,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, base_scale: f32) -> Self {
        Self { position, velocity, base_scale, scale: base_scale }
    }

    /// A body sitting still at `position` with unit scale.
    pub fn at_rest(position: Vec2) -> Self {
        Self::new(position, Vec2::zero(), 1.0)
    }
}

/// One simulated element and the visual handle that mirrors it.
///
/// The handle is created together with the element and returned to the
/// surface when the registry is cleared.
#[derive(Debug)]
pub struct MovableElement<H> {
    pub body: Body,
    pub size: f32,
    pub opacity: f32,
    /// Degrees; fixed at spawn.
    pub rotation: f32,
    handle: H,
}

impl<H: Renderable> MovableElement<H> {
    pub fn new(body: Body, size: f32, opacity: f32, rotation: f32, handle: H) -> Self {
        Self { body, size, opacity, rotation, handle }
    }

    pub fn transform(&self) -> ElementTransform {
        ElementTransform {
            x: self.body.position.x,
            y: self.body.position.y,
            scale: self.body.scale,
            rotation: self.rotation,
            opacity: self.opacity,
        }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub(crate) fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub(crate) fn into_handle(self) -> H {
        self.handle
    }
}
