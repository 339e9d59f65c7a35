use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::coords::Vec2;
use crate::host::{PointerHandler, TimerId, Timers};

use super::{PointerEvent, PointerState};

/// Pointer tracker timing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Trailing throttle window. At most one committed update per window.
    pub throttle_ms: f64,

    /// Inactivity after which the pointer stops counting as interacting.
    pub idle_ms: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 16.0,
            idle_ms: 100.0,
        }
    }
}

/// Throttled pointer position with an idle heuristic.
///
/// Raw moves are coalesced: the first move in a quiet period arms a trailing
/// timer, later moves only replace the remembered sample, and when the timer
/// fires the most recent sample is committed. A second timer, restarted by every
/// raw move, clears `interacting` once the pointer has been still for
/// `idle_ms`.
///
/// Cloning yields another handle onto the same tracker.
#[derive(Clone)]
pub struct PointerTracker {
    shared: Rc<Shared>,
}

struct Shared {
    timers: Rc<dyn Timers>,
    config: TrackerConfig,
    state: Cell<PointerState>,
    latest: Cell<Option<Vec2>>,
    throttle: Cell<Option<TimerId>>,
    idle: Cell<Option<TimerId>>,
    detached: Cell<bool>,
    commits: Cell<u64>,
}

impl PointerTracker {
    pub fn new(timers: Rc<dyn Timers>, config: TrackerConfig, initial: PointerState) -> Self {
        Self {
            shared: Rc::new(Shared {
                timers,
                config,
                state: Cell::new(initial),
                latest: Cell::new(None),
                throttle: Cell::new(None),
                idle: Cell::new(None),
                detached: Cell::new(false),
                commits: Cell::new(0),
            }),
        }
    }

    /// Last committed sample.
    #[inline]
    pub fn state(&self) -> PointerState {
        self.shared.state.get()
    }

    /// Number of samples committed so far.
    pub fn commits(&self) -> u64 {
        self.shared.commits.get()
    }

    /// Throttle and idle timers currently armed.
    pub fn pending_timers(&self) -> usize {
        self.shared.throttle.get().is_some() as usize + self.shared.idle.get().is_some() as usize
    }

    /// A handler suitable for [`crate::host::PointerSource::subscribe`].
    ///
    /// The handler holds a weak reference; events arriving after the tracker is
    /// gone are dropped.
    pub fn listener(&self) -> PointerHandler {
        let weak = Rc::downgrade(&self.shared);
        Box::new(move |event| {
            if let Some(shared) = weak.upgrade() {
                Shared::handle(&shared, event);
            }
        })
    }

    pub fn handle(&self, event: PointerEvent) {
        Shared::handle(&self.shared, event);
    }

    /// Cancels every pending timer and ignores all later events. Idempotent.
    pub fn detach(&self) {
        self.shared.detached.set(true);
        self.shared.cancel_timers();
        self.shared.latest.set(None);
    }
}

impl Shared {
    fn handle(this: &Rc<Self>, event: PointerEvent) {
        if this.detached.get() {
            return;
        }

        match event {
            PointerEvent::Moved(p) => {
                this.latest.set(Some(p));
                Self::restart_idle(this);
                if this.throttle.get().is_none() {
                    let weak = Rc::downgrade(this);
                    let id = this
                        .timers
                        .set_timeout(this.config.throttle_ms, Box::new(move || Self::on_flush(&weak)));
                    this.throttle.set(Some(id));
                }
            }
            PointerEvent::Left => {
                this.cancel_timers();
                this.latest.set(None);
                this.state.set(this.state.get().idle());
            }
        }
    }

    fn restart_idle(this: &Rc<Self>) {
        if let Some(id) = this.idle.take() {
            this.timers.clear_timeout(id);
        }
        let weak = Rc::downgrade(this);
        let id = this
            .timers
            .set_timeout(this.config.idle_ms, Box::new(move || Self::on_idle(&weak)));
        this.idle.set(Some(id));
    }

    fn on_flush(weak: &Weak<Self>) {
        let Some(this) = weak.upgrade() else { return };
        this.throttle.set(None);

        if let Some(p) = this.latest.take() {
            // If the idle timer already fired the sample is stale.
            let interacting = this.idle.get().is_some();
            this.state.set(PointerState { position: p, interacting });
            this.commits.set(this.commits.get() + 1);
        }
    }

    fn on_idle(weak: &Weak<Self>) {
        let Some(this) = weak.upgrade() else { return };
        this.idle.set(None);
        this.state.set(this.state.get().idle());
    }

    fn cancel_timers(&self) {
        if let Some(id) = self.throttle.take() {
            self.timers.clear_timeout(id);
        }
        if let Some(id) = self.idle.take() {
            self.timers.clear_timeout(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::host::ManualHost;

    fn tracker(host: &Rc<ManualHost>) -> PointerTracker {
        PointerTracker::new(
            host.clone(),
            TrackerConfig::default(),
            PointerState::centered(Viewport::new(800.0, 600.0)),
        )
    }

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Moved(Vec2::new(x, y))
    }

    #[test]
    fn starts_centered_and_idle() {
        let host = ManualHost::new();
        let t = tracker(&host);
        assert_eq!(t.state().position, Vec2::new(400.0, 300.0));
        assert!(!t.state().interacting);
    }

    #[test]
    fn burst_inside_window_commits_latest_once() {
        let host = ManualHost::new();
        let t = tracker(&host);

        t.handle(moved(1.0, 1.0));
        host.advance_to(5.0);
        t.handle(moved(2.0, 2.0));
        host.advance_to(10.0);
        t.handle(moved(3.0, 3.0));

        // Nothing committed before the trailing edge.
        assert_eq!(t.commits(), 0);
        assert_eq!(t.state().position, Vec2::new(400.0, 300.0));

        host.advance_to(16.0);
        assert_eq!(t.commits(), 1);
        assert_eq!(t.state(), PointerState::at(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn idle_timer_clears_interacting() {
        let host = ManualHost::new();
        let t = tracker(&host);

        t.handle(moved(10.0, 20.0));
        host.advance_to(16.0);
        assert!(t.state().interacting);

        host.advance_to(99.0);
        assert!(t.state().interacting);
        host.advance_to(100.0);
        assert!(!t.state().interacting);
        assert_eq!(t.state().position, Vec2::new(10.0, 20.0));
        assert_eq!(host.active_timers(), 0);
    }

    #[test]
    fn continued_movement_postpones_idle() {
        let host = ManualHost::new();
        let t = tracker(&host);

        for i in 0..10 {
            host.advance_to(i as f64 * 50.0);
            t.handle(moved(i as f32, 0.0));
        }
        host.advance_to(470.0);
        assert!(t.state().interacting);
    }

    #[test]
    fn leave_cancels_pending_update() {
        let host = ManualHost::new();
        let t = tracker(&host);

        t.handle(moved(5.0, 5.0));
        t.handle(PointerEvent::Left);
        assert_eq!(t.pending_timers(), 0);
        assert_eq!(host.active_timers(), 0);

        host.advance_to(200.0);
        assert_eq!(t.commits(), 0);
        assert!(!t.state().interacting);
    }

    #[test]
    fn detach_cancels_timers_and_ignores_events() {
        let host = ManualHost::new();
        let t = tracker(&host);

        t.handle(moved(5.0, 5.0));
        assert_eq!(host.active_timers(), 2);

        t.detach();
        t.detach();
        assert_eq!(host.active_timers(), 0);

        t.handle(moved(6.0, 6.0));
        assert_eq!(host.active_timers(), 0);
    }

    #[test]
    fn listener_outliving_tracker_is_harmless() {
        let host = ManualHost::new();
        let listener = {
            let t = tracker(&host);
            t.listener()
        };
        let mut listener = listener;
        listener(moved(1.0, 1.0));
        assert_eq!(host.active_timers(), 0);
    }
}
