use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::host::{Clock, TickToken};

use super::{FrameLimiter, FrameTime};

type FrameCallback = Box<dyn FnMut(FrameTime) -> anyhow::Result<()>>;

/// Self-rescheduling animation loop over a host [`Clock`].
///
/// Create with [`FrameLoop::new`], then [`start`](Self::start) it. Every host
/// tick re-requests the next tick *before* the limiter and the callback run, so
/// neither a dropped frame nor a failing callback can end the loop. The loop
/// runs until [`stop`](Self::stop) is called or the `FrameLoop` is dropped.
///
/// The loop never recurses: each continuation goes through the host scheduler.
pub struct FrameLoop {
    inner: Rc<LoopInner>,
}

struct LoopInner {
    clock: Rc<dyn Clock>,
    limiter: RefCell<FrameLimiter>,
    callback: RefCell<Option<FrameCallback>>,
    running: Cell<bool>,
    /// Token of the outstanding tick request, if any.
    pending: Cell<Option<TickToken>>,
    host_ticks: Cell<u64>,
}

impl FrameLoop {
    /// Creates a stopped loop capped at `target_fps`.
    pub fn new(clock: Rc<dyn Clock>, target_fps: f64) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                clock,
                limiter: RefCell::new(FrameLimiter::new(target_fps)),
                callback: RefCell::new(None),
                running: Cell::new(false),
                pending: Cell::new(None),
                host_ticks: Cell::new(0),
            }),
        }
    }

    /// Starts issuing accepted frames to `callback`.
    ///
    /// If already running, the callback is replaced and the loop keeps its pacing.
    pub fn start(&self, callback: impl FnMut(FrameTime) -> anyhow::Result<()> + 'static) {
        *self.inner.callback.borrow_mut() = Some(Box::new(callback));

        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);
        self.inner.limiter.borrow_mut().reset();
        LoopInner::schedule(&self.inner);
    }

    /// Cancels the outstanding tick. Idempotent.
    pub fn stop(&self) {
        self.inner.running.set(false);
        if let Some(token) = self.inner.pending.take() {
            self.inner.clock.cancel_tick(token);
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Host ticks seen since creation, accepted or not.
    pub fn host_ticks(&self) -> u64 {
        self.inner.host_ticks.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl LoopInner {
    fn schedule(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let token = this.clock.request_tick(Box::new(move |timestamp_ms| {
            if let Some(inner) = weak.upgrade() {
                LoopInner::on_tick(&inner, timestamp_ms);
            }
        }));
        this.pending.set(Some(token));
    }

    fn on_tick(this: &Rc<Self>, timestamp_ms: f64) {
        this.pending.set(None);
        if !this.running.get() {
            return;
        }
        this.host_ticks.set(this.host_ticks.get() + 1);

        // Continuation first: nothing below may end the loop.
        Self::schedule(this);

        let Some(ft) = this.limiter.borrow_mut().accept(timestamp_ms) else {
            return;
        };

        // Take the callback out while it runs so it may call `start`/`stop` on us.
        let Some(mut callback) = this.callback.borrow_mut().take() else {
            return;
        };

        if let Err(e) = callback(ft) {
            log::warn!("frame {} callback failed: {e:#}", ft.frame_index);
        }

        let mut slot = this.callback.borrow_mut();
        if slot.is_none() {
            *slot = Some(callback);
        }
    }
}
