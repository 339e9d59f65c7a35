use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use winit::event::WindowEvent;

use crate::coords::Viewport;
use crate::host::{
    Clock, Host, ListenerId, PointerHandler, PointerSource, Scheduler, TickCallback, TickToken,
    TimerCallback, TimerId, Timers,
};
use crate::input::platform::winit::translate_window_event;
use crate::prefs::MotionPreferences;

/// The window seen as a particle-field host.
///
/// Time is milliseconds since the host was created. Tick callbacks run on
/// `RedrawRequested`; timers run whenever the event loop wakes and is told to
/// wake again at the earliest deadline.
pub struct WindowHost {
    started: Instant,
    scheduler: Scheduler,
    scale_factor: Cell<f64>,
    viewport: Cell<Viewport>,
    prefs: MotionPreferences,
}

impl WindowHost {
    pub(crate) fn new(viewport: Viewport, scale_factor: f64, prefs: MotionPreferences) -> Rc<Self> {
        Rc::new(Self {
            started: Instant::now(),
            scheduler: Scheduler::new(),
            scale_factor: Cell::new(scale_factor),
            viewport: Cell::new(viewport),
            prefs,
        })
    }

    pub fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    /// Capability bundle for mounting a field on this window.
    pub fn host(self: &Rc<Self>) -> Host {
        Host::from_shared(self, self.viewport()).with_prefs(self.prefs)
    }

    pub(crate) fn set_viewport(&self, viewport: Viewport, scale_factor: f64) {
        self.viewport.set(viewport);
        self.scale_factor.set(scale_factor);
    }

    /// Forwards pointer-relevant window events to subscribers.
    pub(crate) fn handle_window_event(&self, event: &WindowEvent) {
        if let Some(pointer) = translate_window_event(self.scale_factor.get(), event) {
            self.scheduler.dispatch(pointer);
        }
    }

    pub(crate) fn fire_due_timers(&self) -> usize {
        self.scheduler.fire_due_timers(self.now_ms(), |_| {})
    }

    pub(crate) fn run_ticks(&self) -> usize {
        self.scheduler.run_ticks(self.now_ms())
    }

    /// Wall-clock instant of the earliest pending timer.
    pub(crate) fn next_wake(&self) -> Option<Instant> {
        let deadline = self.scheduler.next_deadline()?;
        Some(self.started + Duration::from_secs_f64(deadline.max(0.0) / 1000.0))
    }
}

impl Clock for WindowHost {
    fn request_tick(&self, callback: TickCallback) -> TickToken {
        self.scheduler.request_tick(callback)
    }

    fn cancel_tick(&self, token: TickToken) {
        self.scheduler.cancel_tick(token);
    }
}

impl Timers for WindowHost {
    fn set_timeout(&self, delay_ms: f64, callback: TimerCallback) -> TimerId {
        self.scheduler
            .set_timeout_at(self.now_ms() + delay_ms.max(0.0), callback)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.scheduler.clear_timeout(id);
    }
}

impl PointerSource for WindowHost {
    fn subscribe(&self, handler: PointerHandler) -> ListenerId {
        self.scheduler.subscribe(handler)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.scheduler.unsubscribe(id);
    }
}
