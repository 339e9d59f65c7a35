//! GPU rendering.
//!
//! Geometry is in logical pixels, top-left origin, +Y down; the vertex shader
//! maps it to NDC with a viewport uniform. Renderers own their pipelines and
//! buffers and rebuild them lazily when the surface format changes.

mod ctx;
mod sprite;

pub use ctx::{RenderCtx, RenderTarget};
pub use sprite::SpriteRenderer;
