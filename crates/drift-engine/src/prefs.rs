//! Environment preferences that can switch animation off.

use crate::coords::Viewport;

/// Viewports narrower than this are treated as phones.
pub const NARROW_VIEWPORT_PX: f32 = 768.0;

/// User and device traits reported by the host.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct MotionPreferences {
    /// The user asked the platform for reduced motion.
    pub reduced_motion: bool,

    /// The primary pointer is a finger rather than a mouse.
    pub touch_device: bool,
}

impl MotionPreferences {
    /// Reads `DRIFT_REDUCED_MOTION` / `DRIFT_TOUCH` (`1`/`true` enable).
    ///
    /// Desktop windowing systems do not expose a portable reduced-motion
    /// query, so hosts fall back to the environment.
    pub fn from_env() -> Self {
        fn flag(name: &str) -> bool {
            std::env::var(name)
                .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false)
        }

        Self {
            reduced_motion: flag("DRIFT_REDUCED_MOTION"),
            touch_device: flag("DRIFT_TOUCH"),
        }
    }
}

/// True when continuous animation should be skipped.
pub fn should_disable_heavy_effects(prefs: MotionPreferences, viewport: Viewport) -> bool {
    prefs.reduced_motion || prefs.touch_device || viewport.width < NARROW_VIEWPORT_PX
}
