//! Frame timing

use std::time::Instant;

/// Frame timer producing the per-frame `dt` fed to the animation controller
///
/// Deltas are clamped to `max_delta` so a stalled frame (window drag, debugger
/// break) does not teleport the drone.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Default upper bound for a single frame delta, in seconds
    pub const DEFAULT_MAX_DELTA: f32 = 0.25;

    /// Create a new timer
    pub fn new() -> Self {
        Self::with_max_delta(Self::DEFAULT_MAX_DELTA)
    }

    /// Create a timer with a custom delta clamp
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: max_delta.max(0.0),
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    fn advance(&mut self, elapsed: f32) -> f32 {
        self.delta_time = elapsed.clamp(0.0, self.max_delta);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total (clamped) time accumulated since timer creation
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_is_clamped() {
        let mut timer = Timer::with_max_delta(0.1);
        assert_eq!(timer.advance(5.0), 0.1);
        assert_eq!(timer.advance(-1.0), 0.0);
        assert_eq!(timer.advance(0.05), 0.05);
        assert_eq!(timer.frame_count(), 3);
        assert!((timer.total_time() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_update_advances_frame_count() {
        let mut timer = Timer::new();
        let dt = timer.update();
        assert!(dt >= 0.0 && dt <= Timer::DEFAULT_MAX_DELTA);
        assert_eq!(timer.frame_count(), 1);
    }
}
