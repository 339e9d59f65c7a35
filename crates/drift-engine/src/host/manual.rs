use std::cell::Cell;
use std::rc::Rc;

use crate::input::PointerEvent;

use super::capability::{
    Clock, ListenerId, PointerHandler, PointerSource, TickCallback, TickToken, TimerCallback,
    TimerId, Timers,
};
use super::scheduler::Scheduler;

/// Headless host driven by a manually advanced virtual clock.
///
/// `frame(ts)` is one host frame: due timers fire first (deadline order, ties in
/// creation order), then every tick callback that was pending when the frame
/// began. Callbacks requested during the frame wait for the next one.
///
/// Used by tests and by anything that wants to run a field without a window.
pub struct ManualHost {
    now: Cell<f64>,
    scheduler: Scheduler,
}

impl ManualHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            now: Cell::new(0.0),
            scheduler: Scheduler::new(),
        })
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> f64 {
        self.now.get()
    }

    /// Runs one host frame at `ts` and returns how many tick callbacks ran.
    pub fn frame(&self, ts: f64) -> usize {
        self.advance_to(ts);
        self.scheduler.run_ticks(ts)
    }

    /// Advances virtual time without producing a frame, firing due timers.
    pub fn advance_to(&self, ts: f64) {
        self.scheduler
            .fire_due_timers(ts, |deadline| self.now.set(self.now.get().max(deadline)));
        self.now.set(self.now.get().max(ts));
    }

    /// Delivers `event` to every current subscriber.
    pub fn dispatch(&self, event: PointerEvent) {
        self.scheduler.dispatch(event);
    }

    pub fn pending_ticks(&self) -> usize {
        self.scheduler.pending_ticks()
    }

    pub fn active_timers(&self) -> usize {
        self.scheduler.active_timers()
    }

    pub fn listener_count(&self) -> usize {
        self.scheduler.listener_count()
    }
}

impl Clock for ManualHost {
    fn request_tick(&self, callback: TickCallback) -> TickToken {
        self.scheduler.request_tick(callback)
    }

    fn cancel_tick(&self, token: TickToken) {
        self.scheduler.cancel_tick(token);
    }
}

impl Timers for ManualHost {
    fn set_timeout(&self, delay_ms: f64, callback: TimerCallback) -> TimerId {
        self.scheduler
            .set_timeout_at(self.now.get() + delay_ms.max(0.0), callback)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.scheduler.clear_timeout(id);
    }
}

impl PointerSource for ManualHost {
    fn subscribe(&self, handler: PointerHandler) -> ListenerId {
        self.scheduler.subscribe(handler)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.scheduler.unsubscribe(id);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn tick_requested_during_frame_waits_for_next_frame() {
        let host = ManualHost::new();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&host);
        let c = Rc::clone(&hits);
        host.request_tick(Box::new(move |_| {
            c.set(c.get() + 1);
            let c2 = Rc::clone(&c);
            h.request_tick(Box::new(move |_| c2.set(c2.get() + 1)));
        }));

        assert_eq!(host.frame(16.0), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(host.pending_ticks(), 1);

        assert_eq!(host.frame(32.0), 1);
        assert_eq!(hits.get(), 2);
        assert_eq!(host.pending_ticks(), 0);
    }

    #[test]
    fn cancelled_tick_never_fires() {
        let host = ManualHost::new();
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        let token = host.request_tick(Box::new(move |_| h.set(true)));
        host.cancel_tick(token);
        host.frame(16.0);
        assert!(!hit.get());
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let host = ManualHost::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (delay, tag) in [(30.0, "c"), (10.0, "a"), (20.0, "b")] {
            let o = Rc::clone(&order);
            host.set_timeout(delay, Box::new(move || o.borrow_mut().push(tag)));
        }

        host.advance_to(25.0);
        assert_eq!(*order.borrow(), vec!["a", "b"]);
        assert_eq!(host.active_timers(), 1);

        host.advance_to(30.0);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert_eq!(host.now(), 30.0);
    }

    #[test]
    fn timer_deadline_is_relative_to_current_time() {
        let host = ManualHost::new();
        host.advance_to(100.0);
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        host.set_timeout(16.0, Box::new(move || h.set(true)));

        host.advance_to(115.0);
        assert!(!hit.get());
        host.advance_to(116.0);
        assert!(hit.get());
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let host = ManualHost::new();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let id = host.subscribe(Box::new(move |_| s.set(s.get() + 1)));

        host.dispatch(PointerEvent::Moved(Vec2::new(1.0, 2.0)));
        host.unsubscribe(id);
        host.dispatch(PointerEvent::Left);

        assert_eq!(seen.get(), 1);
        assert_eq!(host.listener_count(), 0);
    }
}
