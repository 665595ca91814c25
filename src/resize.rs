//! Debounced resize notifications.
//!
//! Hosts report size changes as they happen, often dozens per second while
//! a window is dragged. [`ResizeDebouncer`] holds on to the latest size and
//! releases it only after no further change arrived for a quiet period.
//! [`ResizeSignal`] adds a channel so notifications can come from any thread
//! while the run loop applies them between frames.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

/// Default quiet period before a resize is applied.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(250);

/// Keeps the most recent requested size until it settles.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet_period: Duration,
    pending: Option<((u32, u32), Instant)>,
}

impl ResizeDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Record a size change observed at `now`, replacing any pending one.
    pub fn notify_at(&mut self, width: u32, height: u32, now: Instant) {
        self.pending = Some(((width, height), now));
    }

    /// Record a size change observed now.
    pub fn notify(&mut self, width: u32, height: u32) {
        self.notify_at(width, height, Instant::now());
    }

    /// Take the pending size if it has been quiet for the full period at `now`.
    pub fn poll_at(&mut self, now: Instant) -> Option<(u32, u32)> {
        match self.pending {
            Some((size, at)) if now.saturating_duration_since(at) >= self.quiet_period => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    /// Take the pending size if it has settled.
    pub fn poll(&mut self) -> Option<(u32, u32)> {
        self.poll_at(Instant::now())
    }

    /// Whether a size change is waiting to settle.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

/// Cloneable handle for reporting size changes from any thread.
#[derive(Debug, Clone)]
pub struct ResizeSender {
    tx: Sender<(u32, u32)>,
}

impl ResizeSender {
    /// Report a new surface size.
    ///
    /// Returns `false` once the [`ResizeSignal`] has been dropped. While the
    /// signal lives, sizes queue up until its next poll, where only the
    /// latest one counts.
    pub fn notify(&self, width: u32, height: u32) -> bool {
        self.tx.send((width, height)).is_ok()
    }
}

/// Receiving end of resize notifications, debounced.
#[derive(Debug)]
pub struct ResizeSignal {
    tx: Sender<(u32, u32)>,
    rx: Receiver<(u32, u32)>,
    debouncer: ResizeDebouncer,
}

impl ResizeSignal {
    pub fn new(quiet_period: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            debouncer: ResizeDebouncer::new(quiet_period),
        }
    }

    /// A new sender feeding this signal.
    pub fn sender(&self) -> ResizeSender {
        ResizeSender { tx: self.tx.clone() }
    }

    /// Drain queued notifications and return the size once it has settled.
    pub fn poll_at(&mut self, now: Instant) -> Option<(u32, u32)> {
        while let Ok((width, height)) = self.rx.try_recv() {
            self.debouncer.notify_at(width, height, now);
        }
        self.debouncer.poll_at(now)
    }

    /// Drain and poll using the current time.
    pub fn poll(&mut self) -> Option<(u32, u32)> {
        self.poll_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(250));

        debouncer.notify_at(800, 600, start);
        assert_eq!(debouncer.poll_at(start + Duration::from_millis(100)), None);
        assert_eq!(
            debouncer.poll_at(start + Duration::from_millis(250)),
            Some((800, 600))
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll_at(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_debounce_restarts_on_new_size() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(250));

        debouncer.notify_at(800, 600, start);
        debouncer.notify_at(1024, 768, start + Duration::from_millis(200));
        assert_eq!(debouncer.poll_at(start + Duration::from_millis(300)), None);
        assert_eq!(
            debouncer.poll_at(start + Duration::from_millis(450)),
            Some((1024, 768))
        );
    }

    #[test]
    fn test_signal_from_other_thread() {
        let mut signal = ResizeSignal::new(Duration::ZERO);
        let sender = signal.sender();

        std::thread::spawn(move || {
            sender.notify(640, 480);
            sender.notify(1280, 720);
        })
        .join()
        .unwrap();

        assert_eq!(signal.poll(), Some((1280, 720)));
        assert_eq!(signal.poll(), None);
    }

    #[test]
    fn test_sender_reports_dropped_signal() {
        let signal = ResizeSignal::new(Duration::ZERO);
        let sender = signal.sender();
        assert!(sender.notify(800, 600));

        drop(signal);
        assert!(!sender.notify(1024, 768));
    }
}
