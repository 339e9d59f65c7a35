//! Drift engine crate.
//!
//! Frame-capped, pointer-reactive particle fields. The simulation core
//! (`time`, `input`, `field`, `lifecycle`, `cursor`) only sees the capability traits in
//! `host`; `window`, `device` and `render` provide a winit/wgpu host for them.

pub mod coords;
pub mod paint;
pub mod host;
pub mod time;
pub mod input;
pub mod field;
pub mod scene;

pub mod config;
pub mod lifecycle;
pub mod cursor;
pub mod prefs;
mod error;

pub mod device;
pub mod render;
pub mod window;

pub mod logging;

pub use config::FieldConfig;
pub use cursor::{CursorConfig, CursorFollower};
pub use error::FieldError;
pub use host::Host;
pub use lifecycle::{FieldState, ParticleField};
