//! Frame counting and frame rate.
//!
//! [`FrameClock`] is ticked once per drawn frame. The run loop reads the
//! totals for its [`RunSummary`](crate::RunSummary); the viewer shows the
//! rolling rate in its title. Animations never read wall-clock time, so
//! nothing here feeds back into particle motion.

use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Counts frames and measures how fast they are drawn.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    frames: u64,
    window: Duration,
    window_start: Instant,
    window_frames: u64,
    fps: f32,
}

impl FrameClock {
    /// A clock starting now, refreshing its rolling rate every 500ms.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// A clock that started at `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_tick: start,
            frames: 0,
            window: FPS_WINDOW,
            window_start: start,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Refresh the rolling rate after `window` instead of 500ms.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Count a frame drawn at `now`.
    pub fn tick_at(&mut self, now: Instant) {
        self.frames += 1;
        self.window_frames += 1;
        self.last_tick = now;

        let span = now.saturating_duration_since(self.window_start);
        if span >= self.window && !span.is_zero() {
            self.fps = self.window_frames as f32 / span.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }
    }

    /// Count a frame drawn now.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Frames counted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Wall-clock time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Rate over the most recent completed window, 0 before the first one.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Rate from the start to the last tick.
    pub fn average_fps(&self) -> f32 {
        let span = self.last_tick.saturating_duration_since(self.start);
        if span.is_zero() {
            0.0
        } else {
            self.frames as f32 / span.as_secs_f32()
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.frames(), 0);
        assert_eq!(clock.average_fps(), 0.0);

        for i in 1..=30 {
            clock.tick_at(start + Duration::from_millis(i * 10));
        }
        assert_eq!(clock.frames(), 30);
        assert!((clock.average_fps() - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_rolling_rate_waits_for_window() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start).with_window(Duration::from_secs(1));

        for i in 1..=9 {
            clock.tick_at(start + Duration::from_millis(i * 100));
        }
        assert_eq!(clock.fps(), 0.0);

        clock.tick_at(start + Duration::from_secs(1));
        assert!((clock.fps() - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_rolling_rate_tracks_slowdown() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start).with_window(Duration::from_secs(1));

        // 60 frames in the first second, then 20 in the next
        for i in 1..=60u64 {
            clock.tick_at(start + Duration::from_micros(i * 1_000_000 / 60));
        }
        assert!((clock.fps() - 60.0).abs() < 0.5);

        for i in 1..=20u64 {
            clock.tick_at(start + Duration::from_secs(1) + Duration::from_millis(i * 50));
        }
        assert!((clock.fps() - 20.0).abs() < 0.5);
        assert!((clock.average_fps() - 40.0).abs() < 0.5);
    }
}
