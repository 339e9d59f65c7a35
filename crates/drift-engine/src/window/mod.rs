//! Window runtime.
//!
//! Owns the winit event loop, one window and its GPU context, and exposes the
//! window to particle fields as a [`WindowHost`].

mod app;
mod host;
mod runtime;

pub use app::{App, AppControl};
pub use host::WindowHost;
pub use runtime::{Runtime, RuntimeConfig};
