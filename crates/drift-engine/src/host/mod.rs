//! Host capabilities.
//!
//! The simulation never talks to a window system directly. Everything it needs
//! from the outside world is expressed as a small capability trait:
//!
//! - [`Clock`]: per-frame tick callbacks (the `requestAnimationFrame` analogue)
//! - [`Timers`]: one-shot timeouts used by the pointer tracker
//! - [`PointerSource`]: pointer move/leave subscriptions
//! - [`Surface`] / [`Renderable`]: creation and mutation of visual handles
//!
//! Hosts keep their pending work in a [`Scheduler`]. The winit runtime implements
//! the capabilities for real windows; [`ManualHost`] implements
//! them over a virtual clock for headless use and tests.

mod capability;
mod manual;
mod scheduler;
mod surface;

use std::rc::Rc;

use crate::coords::Viewport;
use crate::prefs::MotionPreferences;

pub use capability::{Clock, ListenerId, PointerHandler, PointerSource, TickCallback, TickToken, TimerCallback, TimerId, Timers};
pub use manual::ManualHost;
pub use scheduler::Scheduler;
pub use surface::{ElementTransform, Renderable, SpriteShape, SpriteSpec, Surface, SurfaceError};

/// Everything a particle field borrows from its host at mount time.
///
/// `pointer` is `None` when the host has no pointer input; fields then animate
/// by drift alone.
#[derive(Clone)]
pub struct Host {
    pub clock: Rc<dyn Clock>,
    pub timers: Rc<dyn Timers>,
    pub pointer: Option<Rc<dyn PointerSource>>,
    /// Viewport read once at mount.
    pub viewport: Viewport,
    pub prefs: MotionPreferences,
}

impl Host {
    /// Bundles a single object that provides every capability.
    pub fn from_shared<H>(host: &Rc<H>, viewport: Viewport) -> Self
    where
        H: Clock + Timers + PointerSource + 'static,
    {
        Self {
            clock: host.clone(),
            timers: host.clone(),
            pointer: Some(host.clone()),
            viewport,
            prefs: MotionPreferences::default(),
        }
    }

    /// Drops pointer input from this host description.
    pub fn without_pointer(mut self) -> Self {
        self.pointer = None;
        self
    }

    pub fn with_prefs(mut self, prefs: MotionPreferences) -> Self {
        self.prefs = prefs;
        self
    }
}
