/// Snapshot handed to the simulation for one accepted frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Host timestamp of the tick, milliseconds.
    pub timestamp_ms: f64,

    /// Time since the previous accepted frame, in seconds (0 for the first frame).
    pub dt: f32,

    /// Counter over accepted frames only.
    pub frame_index: u64,
}

/// Frame-rate cap over a stream of host tick timestamps.
///
/// The host may tick at 60, 120 or 144 Hz; the limiter only lets through ticks
/// that are at least `1000 / target_fps` milliseconds after the last accepted one.
/// Dropped ticks leave no trace, so the cap is a hard bound rather than an average.
///
/// Delta time is clamped to avoid pathological values after the host stalls
/// (debugger pauses, hidden tabs, minimized windows).
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    min_interval_ms: f64,
    last_accepted: Option<f64>,
    frame_index: u64,
    dt_max: f32,
}

impl FrameLimiter {
    /// Creates a limiter for `target_fps` frames per second.
    ///
    /// `target_fps` must be positive and finite; `FieldConfig::validate` enforces this.
    pub fn new(target_fps: f64) -> Self {
        debug_assert!(target_fps > 0.0 && target_fps.is_finite());
        Self {
            min_interval_ms: 1000.0 / target_fps,
            last_accepted: None,
            frame_index: 0,
            dt_max: 0.25,
        }
    }

    #[inline]
    pub fn min_interval_ms(&self) -> f64 {
        self.min_interval_ms
    }

    /// Forgets the last accepted frame; the next tick is accepted unconditionally.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    /// Offers one host tick. Returns `Some` if the tick becomes a simulation frame.
    pub fn accept(&mut self, timestamp_ms: f64) -> Option<FrameTime> {
        let dt_ms = match self.last_accepted {
            None => 0.0,
            Some(last) => {
                let delta = timestamp_ms - last;
                // Also rejects timestamps that run backwards.
                if !(delta >= self.min_interval_ms) {
                    return None;
                }
                delta
            }
        };

        self.last_accepted = Some(timestamp_ms);

        let ft = FrameTime {
            timestamp_ms,
            dt: ((dt_ms / 1000.0) as f32).clamp(0.0, self.dt_max),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        Some(ft)
    }
}
