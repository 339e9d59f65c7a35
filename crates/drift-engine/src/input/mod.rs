//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates window-system events into [`PointerEvent`]s and the
//! [`PointerTracker`] turns the raw stream into a throttled [`PointerState`].

pub mod platform;

mod state;
mod tracker;
mod types;

pub use state::PointerState;
pub use tracker::{PointerTracker, TrackerConfig};
pub use types::PointerEvent;
