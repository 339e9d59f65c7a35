//! Retained sprite table.
//!
//! [`SpriteSurface`] is the [`Surface`](crate::host::Surface) used by the window
//! runtime and by tests: attaching allocates a slot, handles write transforms
//! into their slot, and the renderer reads a snapshot of the live slots each
//! redraw. Clones share the same table.

mod sprite_surface;

pub use sprite_surface::{Sprite, SpriteHandle, SpriteSurface};
