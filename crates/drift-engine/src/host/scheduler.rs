use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::input::PointerEvent;

use super::capability::{
    ListenerId, PointerHandler, TickCallback, TickToken, TimerCallback, TimerId,
};

struct PendingTimer {
    id: TimerId,
    deadline: f64,
    callback: TimerCallback,
}

/// Bookkeeping shared by every host: pending tick callbacks, timeouts keyed by
/// absolute deadline, and pointer subscribers.
///
/// The scheduler has no notion of time itself; the owning host supplies
/// timestamps. Nothing is held borrowed while a callback runs, so callbacks may
/// freely schedule or cancel more work.
#[derive(Default)]
pub struct Scheduler {
    next_id: Cell<u64>,
    ticks: RefCell<Vec<(TickToken, TickCallback)>>,
    timers: RefCell<Vec<PendingTimer>>,
    listeners: RefCell<Vec<(ListenerId, Rc<RefCell<PointerHandler>>)>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_tick(&self, callback: TickCallback) -> TickToken {
        let token = TickToken(self.next_id());
        self.ticks.borrow_mut().push((token, callback));
        token
    }

    pub fn cancel_tick(&self, token: TickToken) {
        self.ticks.borrow_mut().retain(|(t, _)| *t != token);
    }

    /// Runs every tick callback pending when the call began and returns how
    /// many ran. Callbacks requested meanwhile wait for the next call.
    pub fn run_ticks(&self, timestamp_ms: f64) -> usize {
        let due = std::mem::take(&mut *self.ticks.borrow_mut());
        let fired = due.len();
        for (_, callback) in due {
            callback(timestamp_ms);
        }
        fired
    }

    pub fn set_timeout_at(&self, deadline_ms: f64, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id());
        self.timers.borrow_mut().push(PendingTimer { id, deadline: deadline_ms, callback });
        id
    }

    pub fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().retain(|t| t.id != id);
    }

    /// Fires timers with `deadline <= now` in (deadline, creation) order,
    /// including ones armed by earlier callbacks in the same pass. `on_fire`
    /// sees each deadline before its callback runs.
    pub fn fire_due_timers(&self, now_ms: f64, mut on_fire: impl FnMut(f64)) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.pop_due_timer(now_ms) {
            on_fire(timer.deadline);
            (timer.callback)();
            fired += 1;
        }
        fired
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .borrow()
            .iter()
            .map(|t| t.deadline)
            .min_by(f64::total_cmp)
    }

    pub fn subscribe(&self, handler: PointerHandler) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(l, _)| *l != id);
    }

    /// Delivers `event` to every subscriber present when the call began.
    pub fn dispatch(&self, event: PointerEvent) {
        let handlers: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();

        for handler in handlers {
            // A handler that re-enters dispatch for itself is skipped.
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (*handler)(event);
            }
        }
    }

    pub fn pending_ticks(&self) -> usize {
        self.ticks.borrow().len()
    }

    pub fn active_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get().wrapping_add(1);
        self.next_id.set(id);
        id
    }

    fn pop_due_timer(&self, now_ms: f64) -> Option<PendingTimer> {
        let mut timers = self.timers.borrow_mut();

        // Ids are handed out in creation order, so (deadline, id) is a stable order.
        let idx = timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.deadline
                    .total_cmp(&b.deadline)
                    .then(a.id.0.cmp(&b.id.0))
            })
            .map(|(i, _)| i)?;

        Some(timers.remove(idx))
    }
}
