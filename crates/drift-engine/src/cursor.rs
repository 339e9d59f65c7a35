//! Cursor dot with a lagging follower ring.
//!
//! The dot sits on the raw pointer position. The follower eases toward it
//! every accepted frame with exponential smoothing, closing about 95% of the
//! gap within `settle_ms`. Both sprites hide while the pointer is outside the
//! window.
//!
//! A [`CursorFollower`] has the same `Uninitialized -> Running -> Destroyed`
//! lifecycle as [`ParticleField`](crate::ParticleField).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Context;

use crate::coords::Vec2;
use crate::host::{ElementTransform, Host, ListenerId, Renderable, SpriteShape, SpriteSpec, Surface};
use crate::input::PointerEvent;
use crate::lifecycle::FieldState;
use crate::paint::{Color, Tint};
use crate::time::FrameLoop;
use crate::FieldError;

/// Fraction of the gap left after `settle_ms`: `e^-3`.
const SETTLE_RATE: f32 = 3.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CursorConfig {
    pub target_fps: f64,
    /// Time for the follower to close ~95% of the distance to the pointer.
    pub settle_ms: f32,
    pub dot: SpriteSpec,
    pub follower: SpriteSpec,
}

impl Default for CursorConfig {
    fn default() -> Self {
        let white = Tint::solid(Color::from_srgb_u8(0xff, 0xff, 0xff, 0xff));
        Self {
            target_fps: 60.0,
            settle_ms: 300.0,
            dot: SpriteSpec { size: 16.0, shape: SpriteShape::Disc, tint: white },
            follower: SpriteSpec { size: 32.0, shape: SpriteShape::Ring, tint: white },
        }
    }
}

impl CursorConfig {
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.target_fps > 0.0 && self.target_fps.is_finite()) {
            return Err(FieldError::InvalidConfig(format!(
                "cursor target_fps must be positive, got {}",
                self.target_fps
            )));
        }
        if !(self.settle_ms >= 0.0 && self.settle_ms.is_finite()) {
            return Err(FieldError::InvalidConfig(format!(
                "cursor settle_ms must be finite and not negative, got {}",
                self.settle_ms
            )));
        }
        Ok(())
    }
}

/// Moves `current` toward `target` for a frame of `dt_ms`.
///
/// `settle_ms == 0` snaps.
pub fn ease_toward(current: Vec2, target: Vec2, dt_ms: f32, settle_ms: f32) -> Vec2 {
    if settle_ms <= 0.0 {
        return target;
    }
    let keep = (-SETTLE_RATE * dt_ms / settle_ms).exp();
    target + (current - target) * keep
}

struct Trail<H> {
    dot: H,
    follower: H,
    follower_pos: Option<Vec2>,
}

impl<H: Renderable> Trail<H> {
    fn frame(&mut self, target: Option<Vec2>, dt_ms: f32, settle_ms: f32) {
        let Some(target) = target else {
            let hidden = ElementTransform { x: 0.0, y: 0.0, scale: 1.0, rotation: 0.0, opacity: 0.0 };
            set_if_live(&mut self.dot, &hidden);
            set_if_live(&mut self.follower, &hidden);
            return;
        };

        // A pointer re-entering the window drags the follower in from where it left.
        let follower = match self.follower_pos {
            Some(pos) => ease_toward(pos, target, dt_ms, settle_ms),
            None => target,
        };
        self.follower_pos = Some(follower);

        set_if_live(&mut self.dot, &shown(target));
        set_if_live(&mut self.follower, &shown(follower));
    }
}

fn shown(at: Vec2) -> ElementTransform {
    ElementTransform { x: at.x, y: at.y, scale: 1.0, rotation: 0.0, opacity: 1.0 }
}

fn set_if_live<H: Renderable>(handle: &mut H, transform: &ElementTransform) {
    if handle.is_live() {
        handle.set_transform(transform);
    } else {
        log::trace!("cursor sprite is gone; skipping");
    }
}

struct Active<H> {
    trail: Rc<RefCell<Trail<H>>>,
    frame_loop: Option<FrameLoop>,
    listener: Option<ListenerId>,
}

/// Pointer-following cursor sprites on one surface.
pub struct CursorFollower<S: Surface> {
    config: CursorConfig,
    host: Host,
    surface: S,
    state: FieldState,
    target: Rc<Cell<Option<Vec2>>>,
    active: Option<Active<S::Handle>>,
}

impl<S: Surface> CursorFollower<S> {
    pub fn new(config: CursorConfig, host: Host, surface: S) -> Result<Self, FieldError> {
        config.validate()?;
        Ok(Self {
            config,
            host,
            surface,
            state: FieldState::Uninitialized,
            target: Rc::new(Cell::new(None)),
            active: None,
        })
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Pointer position the dot is on, `None` while the pointer is away.
    pub fn target(&self) -> Option<Vec2> {
        self.target.get()
    }

    /// Current follower position, `None` until the pointer first appears.
    pub fn follower(&self) -> Option<Vec2> {
        self.active.as_ref()?.trail.borrow().follower_pos
    }

    /// Releases the listener, the frame loop and both sprites. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(active) = self.active.take() {
            if let Some(frame_loop) = active.frame_loop {
                frame_loop.stop();
            }
            if let (Some(id), Some(source)) = (active.listener, self.host.pointer.as_ref()) {
                source.unsubscribe(id);
            }
            match Rc::try_unwrap(active.trail) {
                Ok(trail) => {
                    let trail = trail.into_inner();
                    self.surface.detach(trail.dot);
                    self.surface.detach(trail.follower);
                }
                Err(_) => log::warn!("cursor trail still shared at unmount; sprites leak"),
            }
        }
        self.target.set(None);
        if self.state != FieldState::Destroyed {
            log::debug!("cursor {:?} -> Destroyed", self.state);
            self.state = FieldState::Destroyed;
        }
    }
}

impl<S> CursorFollower<S>
where
    S: Surface,
    S::Handle: 'static,
{
    /// Attaches both sprites and starts following.
    ///
    /// Hosts without pointer input, or that report a touch device, get nothing
    /// attached and no loop; there is no cursor to follow. Reduced motion keeps
    /// the follower but makes it snap instead of ease.
    pub fn mount(&mut self) -> Result<(), FieldError> {
        if self.state != FieldState::Uninitialized {
            return Err(FieldError::InvalidState { op: "mount", state: self.state });
        }

        let source = match self.host.pointer.clone() {
            Some(source) if !self.host.prefs.touch_device => source,
            _ => {
                log::debug!("no mouse pointer; cursor stays hidden");
                self.state = FieldState::Running;
                return Ok(());
            }
        };

        let dot = match self.surface.attach(&self.config.dot) {
            Ok(handle) => handle,
            Err(e) => {
                self.state = FieldState::Destroyed;
                return Err(FieldError::Attach(e));
            }
        };
        let follower = match self.surface.attach(&self.config.follower) {
            Ok(handle) => handle,
            Err(e) => {
                self.surface.detach(dot);
                self.state = FieldState::Destroyed;
                return Err(FieldError::Attach(e));
            }
        };

        let mut trail = Trail { dot, follower, follower_pos: None };
        trail.frame(None, 0.0, 0.0);
        let trail = Rc::new(RefCell::new(trail));

        let target = Rc::downgrade(&self.target);
        let listener = source.subscribe(Box::new(move |event| {
            if let Some(target) = target.upgrade() {
                target.set(match event {
                    PointerEvent::Moved(p) => Some(p),
                    PointerEvent::Left => None,
                });
            }
        }));

        let settle_ms = if self.host.prefs.reduced_motion { 0.0 } else { self.config.settle_ms };
        let frame_loop = FrameLoop::new(self.host.clock.clone(), self.config.target_fps);
        let frame_trail = trail.clone();
        let frame_target = self.target.clone();
        frame_loop.start(move |ft| {
            frame_trail
                .try_borrow_mut()
                .context("cursor trail is borrowed during a frame")?
                .frame(frame_target.get(), ft.dt * 1000.0, settle_ms);
            Ok(())
        });

        self.active = Some(Active { trail, frame_loop: Some(frame_loop), listener: Some(listener) });
        self.state = FieldState::Running;
        log::debug!("cursor mounted at {} fps", self.config.target_fps);
        Ok(())
    }
}

impl<S: Surface> Drop for CursorFollower<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::host::ManualHost;
    use crate::prefs::MotionPreferences;
    use crate::scene::SpriteSurface;

    fn cursor(prefs: MotionPreferences) -> (Rc<ManualHost>, CursorFollower<SpriteSurface>) {
        let host = ManualHost::new();
        let cursor = CursorFollower::new(
            CursorConfig::default(),
            Host::from_shared(&host, Viewport::new(1280.0, 800.0)).with_prefs(prefs),
            SpriteSurface::new(),
        )
        .unwrap();
        (host, cursor)
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    // ── easing ────────────────────────────────────────────────────────────

    #[test]
    fn easing_closes_most_of_the_gap_in_settle_time() {
        let start = Vec2::zero();
        let target = Vec2::new(100.0, 0.0);
        let mut pos = start;
        for _ in 0..18 {
            pos = ease_toward(pos, target, 300.0 / 18.0, 300.0);
        }
        assert!((pos.x - 95.02).abs() < 0.1, "{pos:?}");
    }

    #[test]
    fn easing_never_overshoots() {
        let p = ease_toward(Vec2::zero(), Vec2::new(10.0, -10.0), 1000.0, 300.0);
        assert!(p.x <= 10.0 && p.y >= -10.0);
        assert!(p.x > 9.9);
    }

    #[test]
    fn zero_settle_snaps() {
        assert_eq!(ease_toward(Vec2::zero(), Vec2::new(3.0, 4.0), 16.0, 0.0), Vec2::new(3.0, 4.0));
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn follower_lags_behind_the_dot() {
        let (host, mut cursor) = cursor(MotionPreferences::default());
        cursor.mount().unwrap();
        assert_eq!(cursor.surface().live_count(), 2);
        assert!(cursor.surface().sprites().iter().all(|s| s.transform.opacity == 0.0));

        host.dispatch(PointerEvent::Moved(Vec2::new(100.0, 100.0)));
        host.frame(0.0);
        assert_eq!(cursor.follower(), Some(Vec2::new(100.0, 100.0)));

        host.dispatch(PointerEvent::Moved(Vec2::new(200.0, 100.0)));
        host.frame(20.0);

        let sprites = cursor.surface().sprites();
        assert_eq!((sprites[0].transform.x, sprites[0].transform.opacity), (200.0, 1.0));
        let follower = cursor.follower().unwrap();
        assert!(follower.x > 100.0 && follower.x < 200.0, "{follower:?}");
        assert_eq!(sprites[1].transform.x, follower.x);

        for i in 2..120 {
            host.frame(i as f64 * 20.0);
        }
        assert!(approx(cursor.follower().unwrap(), Vec2::new(200.0, 100.0)));
    }

    #[test]
    fn leaving_hides_both_sprites() {
        let (host, mut cursor) = cursor(MotionPreferences::default());
        cursor.mount().unwrap();
        host.dispatch(PointerEvent::Moved(Vec2::new(10.0, 10.0)));
        host.frame(0.0);
        host.dispatch(PointerEvent::Left);
        host.frame(20.0);

        assert_eq!(cursor.target(), None);
        assert!(cursor.surface().sprites().iter().all(|s| s.transform.opacity == 0.0));
    }

    #[test]
    fn reduced_motion_snaps_the_follower() {
        let prefs = MotionPreferences { reduced_motion: true, touch_device: false };
        let (host, mut cursor) = cursor(prefs);
        cursor.mount().unwrap();
        host.dispatch(PointerEvent::Moved(Vec2::new(10.0, 10.0)));
        host.frame(0.0);
        host.dispatch(PointerEvent::Moved(Vec2::new(500.0, 20.0)));
        host.frame(20.0);
        assert_eq!(cursor.follower(), Some(Vec2::new(500.0, 20.0)));
    }

    #[test]
    fn touch_devices_get_no_cursor() {
        let prefs = MotionPreferences { reduced_motion: false, touch_device: true };
        let (host, mut cursor) = cursor(prefs);
        cursor.mount().unwrap();
        assert_eq!(cursor.state(), FieldState::Running);
        assert_eq!(cursor.surface().live_count(), 0);
        assert_eq!(host.pending_ticks(), 0);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn unmount_releases_everything() {
        let (host, mut cursor) = cursor(MotionPreferences::default());
        let surface = cursor.surface().clone();
        cursor.mount().unwrap();
        assert_eq!(host.pending_ticks(), 1);
        assert_eq!(host.listener_count(), 1);

        cursor.unmount();
        cursor.unmount();
        assert_eq!(cursor.state(), FieldState::Destroyed);
        assert_eq!(host.pending_ticks(), 0);
        assert_eq!(host.listener_count(), 0);
        assert_eq!(surface.live_count(), 0);
        assert!(cursor.mount().is_err());
    }

    #[test]
    fn full_surface_attaches_nothing() {
        let host = ManualHost::new();
        let mut cursor = CursorFollower::new(
            CursorConfig::default(),
            Host::from_shared(&host, Viewport::new(1280.0, 800.0)),
            SpriteSurface::with_capacity(1),
        )
        .unwrap();

        assert!(matches!(cursor.mount(), Err(FieldError::Attach(_))));
        assert_eq!(cursor.state(), FieldState::Destroyed);
        assert_eq!(cursor.surface().live_count(), 0);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn negative_settle_is_rejected() {
        let host = ManualHost::new();
        let config = CursorConfig { settle_ms: -1.0, ..CursorConfig::default() };
        let result = CursorFollower::new(config, Host::from_shared(&host, Viewport::new(10.0, 10.0)), SpriteSurface::new());
        assert!(matches!(result, Err(FieldError::InvalidConfig(_))));
    }
}
