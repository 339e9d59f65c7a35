//! wgpu device and window surface.
//!
//! [`Gpu`] creates the instance, adapter, device and queue for one window,
//! keeps the swapchain configured across resizes, and hands out one
//! [`GpuFrame`] per redraw.

mod gpu;
mod init;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
