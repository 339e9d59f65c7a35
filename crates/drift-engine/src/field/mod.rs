//! Particle field simulation.
//!
//! A [`Registry`] owns the live elements and their visual handles. Each
//! accepted frame runs the physics step over every element, then pushes the
//! results to the handles through [`render_sync`].

mod element;
mod physics;
mod registry;
mod spawn;
mod sync;

pub use element::{Body, MovableElement};
pub use physics::{repulsion_force, step_body, PhysicsParams};
pub use registry::{Registry, StepReport};
pub use spawn::{ElementSeed, Spawner};
pub use sync::{render_sync, SyncReport};
