//! Field lifecycle.
//!
//! A [`ParticleField`] ties together a [`Registry`], a [`FrameLoop`] and a
//! [`PointerTracker`] over one [`Host`] and one [`Surface`]:
//!
//! ```text
//! Uninitialized --mount--> Running --unmount--> Destroyed
//!        \__________________unmount__________________/
//! ```
//!
//! Everything acquired by `mount` (tick request, pointer subscription, tracker
//! timers, visual handles) is released by `unmount`, which `Drop` also runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Context;

use crate::config::FieldConfig;
use crate::coords::Viewport;
use crate::field::{Body, Registry};
use crate::host::{Host, ListenerId, Surface};
use crate::input::{PointerState, PointerTracker};
use crate::prefs::should_disable_heavy_effects;
use crate::time::{FrameLoop, FrameStats, StatsSample};
use crate::FieldError;

/// Where a field is in its life. There is no way back from `Destroyed`;
/// build a new field instead.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldState {
    /// Built and validated; nothing acquired yet.
    Uninitialized,
    /// Mounted. Covers static mounts, which hold elements but no loop.
    Running,
    /// Unmounted or failed to mount. Holds nothing.
    Destroyed,
}

/// Resources held while mounted.
struct Active<H> {
    registry: Rc<RefCell<Registry<H>>>,
    frame_loop: Option<FrameLoop>,
    tracker: Option<PointerTracker>,
    listener: Option<ListenerId>,
    stats: Rc<RefCell<FrameStats>>,
    frames: Rc<Cell<u64>>,
}

/// A mountable, pointer-reactive particle field.
pub struct ParticleField<S: Surface> {
    config: FieldConfig,
    host: Host,
    surface: S,
    state: FieldState,
    active: Option<Active<S::Handle>>,
}

impl<S: Surface> ParticleField<S> {
    pub fn new(config: FieldConfig, host: Host, surface: S) -> Result<Self, FieldError> {
        config.validate()?;
        Ok(Self {
            config,
            host,
            surface,
            state: FieldState::Uninitialized,
            active: None,
        })
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The surface the elements are attached to. Hosts read it to draw.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// True while the frame loop is running (false for static mounts).
    pub fn is_animating(&self) -> bool {
        self.active
            .as_ref()
            .and_then(|a| a.frame_loop.as_ref())
            .is_some_and(FrameLoop::is_running)
    }

    /// Latest committed pointer sample, if the field tracks the pointer.
    pub fn pointer(&self) -> Option<PointerState> {
        self.active.as_ref()?.tracker.as_ref().map(PointerTracker::state)
    }

    /// Latest once-per-second frame-rate sample.
    pub fn stats(&self) -> Option<StatsSample> {
        self.active.as_ref()?.stats.borrow().latest()
    }

    /// Accepted frames since mount.
    pub fn frames(&self) -> u64 {
        self.active.as_ref().map_or(0, |a| a.frames.get())
    }

    /// Live elements; zero unless mounted.
    pub fn element_count(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.registry.borrow().len())
    }

    /// Snapshot of every element's kinematic state, in spawn order.
    pub fn bodies(&self) -> Vec<Body> {
        self.active
            .as_ref()
            .map(|a| a.registry.borrow().elements().iter().map(|e| e.body).collect())
            .unwrap_or_default()
    }

    /// Adopts a new viewport. Only valid while running.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), FieldError> {
        let Some(active) = self.active.as_ref() else {
            return Err(FieldError::InvalidState { op: "resize", state: self.state });
        };
        self.host.viewport = viewport;
        active.registry.borrow_mut().resize(viewport);
        log::debug!("field resized to {}x{}", viewport.width, viewport.height);
        Ok(())
    }

    /// Releases everything `mount` acquired. Safe from any state, any number
    /// of times.
    pub fn unmount(&mut self) {
        if let Some(active) = self.active.take() {
            if let Some(frame_loop) = active.frame_loop {
                frame_loop.stop();
            }
            if let (Some(id), Some(source)) = (active.listener, self.host.pointer.as_ref()) {
                source.unsubscribe(id);
            }
            if let Some(tracker) = active.tracker {
                tracker.detach();
            }
            active.registry.borrow_mut().clear(&mut self.surface);
        }

        if self.state != FieldState::Destroyed {
            log::debug!("field {:?} -> Destroyed", self.state);
            self.state = FieldState::Destroyed;
        }
    }
}

impl<S> ParticleField<S>
where
    S: Surface,
    S::Handle: 'static,
{
    /// Creates the elements and starts animating.
    ///
    /// When the host's motion preferences ask for reduced effects the elements
    /// are placed and rendered once, and neither the frame loop nor the
    /// pointer subscription is started.
    pub fn mount(&mut self) -> Result<(), FieldError> {
        if self.state != FieldState::Uninitialized {
            return Err(FieldError::InvalidState { op: "mount", state: self.state });
        }

        let viewport = self.host.viewport;
        let registry = match Registry::initialize(&mut self.surface, &self.config, viewport) {
            Ok(registry) => Rc::new(RefCell::new(registry)),
            Err(e) => {
                self.state = FieldState::Destroyed;
                return Err(e);
            }
        };

        let mut active = Active {
            registry,
            frame_loop: None,
            tracker: None,
            listener: None,
            stats: Rc::new(RefCell::new(FrameStats::new())),
            frames: Rc::new(Cell::new(0)),
        };

        let is_static = self.config.respect_motion_preferences
            && should_disable_heavy_effects(self.host.prefs, viewport);

        if is_static {
            let report = active.registry.borrow_mut().sync();
            log::debug!("field mounted static: {} elements rendered once", report.synced);
        } else {
            let tracker = PointerTracker::new(
                self.host.timers.clone(),
                self.config.tracker_config(),
                PointerState::centered(viewport),
            );

            match self.host.pointer.as_ref() {
                Some(source) => active.listener = Some(source.subscribe(tracker.listener())),
                None => log::debug!("host has no pointer input; field drifts only"),
            }

            let frame_loop = FrameLoop::new(self.host.clock.clone(), self.config.target_fps);
            let registry = active.registry.clone();
            let stats = active.stats.clone();
            let frames = active.frames.clone();
            let pointer = tracker.clone();

            frame_loop.start(move |ft| {
                let mut registry = registry
                    .try_borrow_mut()
                    .context("registry is borrowed during a frame")?;

                // Physics for every element first, then one sync pass.
                registry.step(pointer.state());
                registry.sync();

                frames.set(frames.get() + 1);
                if let Some(sample) = stats.borrow_mut().record(&ft) {
                    log::trace!("field {} fps, {:.1} ms/frame", sample.fps, sample.frame_time_ms);
                }
                Ok(())
            });

            active.tracker = Some(tracker);
            active.frame_loop = Some(frame_loop);
            log::debug!(
                "field mounted: {} elements at {} fps",
                active.registry.borrow().len(),
                self.config.target_fps
            );
        }

        self.active = Some(active);
        self.state = FieldState::Running;
        Ok(())
    }
}

impl<S: Surface> Drop for ParticleField<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ManualHost, SurfaceError};
    use crate::input::PointerEvent;
    use crate::coords::Vec2;
    use crate::prefs::MotionPreferences;
    use crate::scene::SpriteSurface;

    fn field(config: FieldConfig) -> (Rc<ManualHost>, ParticleField<SpriteSurface>) {
        let host = ManualHost::new();
        let field = ParticleField::new(
            config.with_seed(11),
            Host::from_shared(&host, Viewport::new(1024.0, 768.0)),
            SpriteSurface::new(),
        )
        .unwrap();
        (host, field)
    }

    // ── states ────────────────────────────────────────────────────────────

    #[test]
    fn new_is_uninitialized() {
        let (_host, field) = field(FieldConfig::particles());
        assert_eq!(field.state(), FieldState::Uninitialized);
        assert_eq!(field.element_count(), 0);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let host = ManualHost::new();
        let config = FieldConfig { target_fps: -1.0, ..FieldConfig::particles() };
        let result = ParticleField::new(config, Host::from_shared(&host, Viewport::new(10.0, 10.0)), SpriteSurface::new());
        assert!(matches!(result, Err(FieldError::InvalidConfig(_))));
    }

    #[test]
    fn mount_twice_is_an_error() {
        let (_host, mut field) = field(FieldConfig::particles());
        field.mount().unwrap();
        assert_eq!(
            field.mount(),
            Err(FieldError::InvalidState { op: "mount", state: FieldState::Running })
        );
    }

    #[test]
    fn mount_after_unmount_is_an_error() {
        let (_host, mut field) = field(FieldConfig::particles());
        field.unmount();
        assert_eq!(field.state(), FieldState::Destroyed);
        assert!(field.mount().is_err());
    }

    #[test]
    fn failed_attach_destroys_the_field() {
        let host = ManualHost::new();
        let mut field = ParticleField::new(
            FieldConfig::particles(),
            Host::from_shared(&host, Viewport::new(800.0, 600.0)),
            SpriteSurface::with_capacity(3),
        )
        .unwrap();

        assert_eq!(field.mount(), Err(FieldError::Attach(SurfaceError::Full { capacity: 3 })));
        assert_eq!(field.state(), FieldState::Destroyed);
        assert_eq!(field.surface().live_count(), 0);
        assert_eq!(host.pending_ticks(), 0);
        assert_eq!(host.listener_count(), 0);
    }

    // ── resources ─────────────────────────────────────────────────────────

    #[test]
    fn mount_acquires_and_unmount_releases() {
        let (host, mut field) = field(FieldConfig::particles());
        field.mount().unwrap();

        assert!(field.is_animating());
        assert_eq!(host.pending_ticks(), 1);
        assert_eq!(host.listener_count(), 1);
        assert_eq!(field.surface().live_count(), 15);

        host.dispatch(PointerEvent::Moved(Vec2::new(10.0, 10.0)));
        assert_eq!(host.active_timers(), 2);

        field.unmount();
        assert_eq!(host.pending_ticks(), 0);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.active_timers(), 0);
        assert_eq!(field.surface().live_count(), 0);

        field.unmount();
        assert_eq!(field.state(), FieldState::Destroyed);
    }

    #[test]
    fn drop_unmounts() {
        let (host, mut field) = field(FieldConfig::particles());
        let surface = field.surface().clone();
        field.mount().unwrap();
        drop(field);

        assert_eq!(host.pending_ticks(), 0);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(surface.live_count(), 0);
    }

    #[test]
    fn frames_step_and_sync() {
        let (host, mut field) = field(FieldConfig::particles());
        field.mount().unwrap();

        let before = field.surface().sprites();
        for i in 0..10 {
            host.frame(i as f64 * 40.0);
        }
        assert_eq!(field.frames(), 10);
        assert_ne!(field.surface().sprites(), before);
    }

    #[test]
    fn pointer_sample_reaches_the_field() {
        let (host, mut field) = field(FieldConfig::particles());
        field.mount().unwrap();
        assert_eq!(field.pointer(), Some(PointerState::centered(Viewport::new(1024.0, 768.0))));

        host.dispatch(PointerEvent::Moved(Vec2::new(5.0, 6.0)));
        host.advance_to(16.0);
        assert_eq!(field.pointer(), Some(PointerState::at(Vec2::new(5.0, 6.0))));
    }

    // ── static mount ──────────────────────────────────────────────────────

    #[test]
    fn reduced_motion_mounts_static() {
        let host = ManualHost::new();
        let prefs = MotionPreferences { reduced_motion: true, touch_device: false };
        let mut field = ParticleField::new(
            FieldConfig::particles(),
            Host::from_shared(&host, Viewport::new(1024.0, 768.0)).with_prefs(prefs),
            SpriteSurface::new(),
        )
        .unwrap();

        field.mount().unwrap();
        assert_eq!(field.state(), FieldState::Running);
        assert!(!field.is_animating());
        assert_eq!(host.pending_ticks(), 0);
        assert_eq!(host.listener_count(), 0);
        assert!(field.surface().sprites().iter().all(|s| s.transform.opacity > 0.0));
    }

    #[test]
    fn preferences_can_be_ignored() {
        let host = ManualHost::new();
        let prefs = MotionPreferences { reduced_motion: true, touch_device: true };
        let config = FieldConfig { respect_motion_preferences: false, ..FieldConfig::particles() };
        let mut field = ParticleField::new(
            config,
            Host::from_shared(&host, Viewport::new(320.0, 640.0)).with_prefs(prefs),
            SpriteSurface::new(),
        )
        .unwrap();

        field.mount().unwrap();
        assert!(field.is_animating());
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_requires_a_mounted_field() {
        let (_host, mut field) = field(FieldConfig::particles());
        assert!(field.resize(Viewport::new(10.0, 10.0)).is_err());
        field.mount().unwrap();
        assert!(field.resize(Viewport::new(10.0, 10.0)).is_ok());
    }
}
