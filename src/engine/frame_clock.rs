use web_time::Instant;

/// Longest step fed to the camera after a stalled frame.
const MAX_DT: f32 = 0.1;

/// Frame delta timing with a smoothed FPS estimate.
pub struct FrameClock {
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Start the clock now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Seconds since the previous call, capped at 0.1.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if dt > 0.0 {
            self.smoothed_fps =
                self.smoothed_fps * (1.0 - self.smoothing) + (1.0 / dt) * self.smoothing;
        }
        dt.min(MAX_DT)
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_bounded() {
        let mut clock = FrameClock::new();
        let dt = clock.tick();
        assert!((0.0..=MAX_DT).contains(&dt));
        assert!(clock.fps() > 0.0);
    }
}
