use crate::input::PointerEvent;

/// Identifies a pending tick request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TickToken(pub u64);

/// Identifies a pending timeout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TimerId(pub u64);

/// Identifies a pointer subscription.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(pub u64);

/// Receives the host frame timestamp in milliseconds.
pub type TickCallback = Box<dyn FnOnce(f64)>;
pub type TimerCallback = Box<dyn FnOnce()>;
pub type PointerHandler = Box<dyn FnMut(PointerEvent)>;

/// Per-frame callback source.
///
/// Callbacks are never run from inside `request_tick`; they run on the next
/// host frame, so a callback that requests another tick does not recurse.
pub trait Clock {
    fn request_tick(&self, callback: TickCallback) -> TickToken;

    /// Cancels a pending tick. Unknown or already-fired tokens are ignored.
    fn cancel_tick(&self, token: TickToken);
}

/// One-shot timeouts.
pub trait Timers {
    fn set_timeout(&self, delay_ms: f64, callback: TimerCallback) -> TimerId;

    /// Cancels a pending timeout. Unknown or already-fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

/// Pointer move/leave subscriptions.
pub trait PointerSource {
    fn subscribe(&self, handler: PointerHandler) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
}
