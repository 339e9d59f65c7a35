use super::FrameTime;

/// One measurement window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StatsSample {
    /// Accepted frames per second over the window, rounded.
    pub fps: u32,
    /// Mean time between accepted frames, milliseconds.
    pub frame_time_ms: f64,
}

/// Rolling frame-rate meter.
///
/// Counts accepted frames and closes a window once at least a second of host
/// time has passed since the window opened.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    window_start: Option<f64>,
    frames: u32,
    latest: Option<StatsSample>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame. Returns the new sample when a window closes.
    pub fn record(&mut self, ft: &FrameTime) -> Option<StatsSample> {
        let start = *self.window_start.get_or_insert(ft.timestamp_ms);
        self.frames += 1;

        let elapsed = ft.timestamp_ms - start;
        if elapsed < 1000.0 {
            return None;
        }

        // The opening frame belongs to the previous window's boundary.
        let intervals = self.frames.saturating_sub(1).max(1);
        let sample = StatsSample {
            fps: ((intervals as f64 * 1000.0) / elapsed).round() as u32,
            frame_time_ms: elapsed / intervals as f64,
        };

        self.window_start = Some(ft.timestamp_ms);
        self.frames = 1;
        self.latest = Some(sample);
        Some(sample)
    }

    pub fn latest(&self) -> Option<StatsSample> {
        self.latest
    }
}
