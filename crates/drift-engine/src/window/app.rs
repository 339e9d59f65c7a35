use std::rc::Rc;

use crate::coords::Viewport;
use crate::scene::Sprite;

use super::WindowHost;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// What the runtime drives.
///
/// The runtime owns drawing; an app only decides which sprites exist.
pub trait App {
    /// Called once the window and GPU are ready. An error ends the run.
    fn start(&mut self, host: &Rc<WindowHost>) -> anyhow::Result<()>;

    /// Logical viewport changed.
    fn resized(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    /// Called every redraw after host ticks have run.
    fn frame(&mut self, now_ms: f64) -> AppControl {
        let _ = now_ms;
        AppControl::Continue
    }

    /// Appends everything to draw this redraw, back to front.
    fn sprites(&self, out: &mut Vec<Sprite>);
}
