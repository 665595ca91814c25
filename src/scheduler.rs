//! Frame schedulers.
//!
//! A [`FrameScheduler`] decides when the next frame happens. The run loop
//! asks it for a token before every frame; the scheduler may block until the
//! next refresh, return immediately, or report that the host is gone.

use std::thread;
use std::time::{Duration, Instant};

/// Identifies one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(u64);

impl FrameToken {
    /// Sequence number of the frame, starting at 0.
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of frame timing for the run loop.
pub trait FrameScheduler {
    /// Wait until the next frame should be drawn.
    ///
    /// Returns `None` once the host can no longer schedule frames.
    fn request_frame(&mut self) -> Option<FrameToken>;

    /// Give back a token that will not be used.
    fn cancel(&mut self, _token: FrameToken) {}
}

type FrameHook = Box<dyn FnMut(FrameToken) + Send>;

/// Steps frames synchronously without waiting.
///
/// Issues a fixed budget of frames (or unlimited), then reports the host as
/// gone. An optional hook runs as each token is issued, which lets tests
/// stop the loop or inject resizes at a precise frame.
pub struct ManualScheduler {
    remaining: Option<u64>,
    next_id: u64,
    cancelled: Vec<FrameToken>,
    hook: Option<FrameHook>,
}

impl ManualScheduler {
    /// Issue exactly `frames` frames.
    pub fn new(frames: u64) -> Self {
        Self {
            remaining: Some(frames),
            next_id: 0,
            cancelled: Vec::new(),
            hook: None,
        }
    }

    /// Issue frames until the loop is stopped.
    pub fn unbounded() -> Self {
        Self {
            remaining: None,
            ..Self::new(0)
        }
    }

    /// Run `hook` as each token is issued.
    pub fn on_frame<F>(mut self, hook: F) -> Self
    where
        F: FnMut(FrameToken) + Send + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Number of tokens issued so far.
    pub fn issued(&self) -> u64 {
        self.next_id
    }

    /// Tokens handed back through [`FrameScheduler::cancel`].
    pub fn cancelled(&self) -> &[FrameToken] {
        &self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameToken> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let token = FrameToken(self.next_id);
        self.next_id += 1;
        if let Some(hook) = &mut self.hook {
            hook(token);
        }
        Some(token)
    }

    fn cancel(&mut self, token: FrameToken) {
        self.cancelled.push(token);
    }
}

/// Paces frames to a target rate by sleeping between them.
///
/// If the loop falls more than one frame behind, the schedule restarts from
/// the current time instead of bursting to catch up.
#[derive(Debug)]
pub struct FixedRateScheduler {
    frame_duration: Duration,
    next_deadline: Option<Instant>,
    next_id: u64,
}

impl FixedRateScheduler {
    /// Schedule `fps` frames per second.
    ///
    /// Rates that are not positive, or so small that one frame would not fit
    /// in a [`Duration`], fall back to 60.
    pub fn new(fps: f32) -> Self {
        let frame_duration = Some(fps)
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .and_then(|fps| Duration::try_from_secs_f32(1.0 / fps).ok())
            .unwrap_or_else(|| Duration::from_secs_f32(1.0 / 60.0));
        Self {
            frame_duration,
            next_deadline: None,
            next_id: 0,
        }
    }

    /// Time between frames.
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}

impl Default for FixedRateScheduler {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn request_frame(&mut self) -> Option<FrameToken> {
        let now = Instant::now();
        let deadline = match self.next_deadline {
            Some(deadline) if deadline + self.frame_duration >= now => deadline,
            _ => now,
        };

        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.next_deadline = Some(deadline + self.frame_duration);

        let token = FrameToken(self.next_id);
        self.next_id += 1;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_manual_budget() {
        let mut scheduler = ManualScheduler::new(3);
        let ids: Vec<u64> = std::iter::from_fn(|| scheduler.request_frame())
            .map(FrameToken::id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(scheduler.request_frame(), None);
        assert_eq!(scheduler.issued(), 3);
    }

    #[test]
    fn test_manual_hook_sees_every_token() {
        let seen = Arc::new(AtomicU64::new(0));
        let counter = seen.clone();
        let mut scheduler = ManualScheduler::unbounded().on_frame(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for _ in 0..25 {
            assert!(scheduler.request_frame().is_some());
        }
        assert_eq!(seen.load(Ordering::SeqCst), 25);
    }

    #[test]
    fn test_fixed_rate_paces_frames() {
        let mut scheduler = FixedRateScheduler::new(100.0);
        let start = Instant::now();
        for _ in 0..5 {
            scheduler.request_frame();
        }
        // first frame is immediate, the next four wait ~10ms each
        assert!(start.elapsed() >= Duration::from_millis(35));
    }

    #[test]
    fn test_fixed_rate_invalid_fps_defaults() {
        let default = Duration::from_secs_f32(1.0 / 60.0);
        for fps in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            assert_eq!(FixedRateScheduler::new(fps).frame_duration(), default);
        }
    }

    #[test]
    fn test_fixed_rate_tiny_fps_defaults() {
        let default = Duration::from_secs_f32(1.0 / 60.0);
        for fps in [1e-30, f32::MIN_POSITIVE, 1e-40] {
            assert_eq!(FixedRateScheduler::new(fps).frame_duration(), default);
        }
        // slow but representable rates are kept
        assert_eq!(
            FixedRateScheduler::new(0.5).frame_duration(),
            Duration::from_secs(2)
        );
    }
}
