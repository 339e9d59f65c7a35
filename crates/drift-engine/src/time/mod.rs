//! Time subsystem.
//!
//! Frame pacing for the simulation, independent of the host refresh rate:
//! - `FrameLimiter` decides which host ticks become simulation frames
//! - `FrameLoop` keeps a tick request outstanding on a `Clock` and feeds accepted
//!   frames to a callback
//! - `FrameStats` turns accepted frames into once-per-second fps samples

mod frame_limiter;
mod frame_loop;
mod stats;

pub use frame_limiter::{FrameLimiter, FrameTime};
pub use frame_loop::FrameLoop;
pub use stats::{FrameStats, StatsSample};
