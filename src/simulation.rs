//! The animation run loop.
//!
//! [`Simulation`] pairs an [`Animation`] such as a
//! [`ParticleField`](crate::ParticleField) with a [`FrameScheduler`] and
//! drives it until stopped:
//!
//! ```ignore
//! let field = ParticleField::new(PixelSurface::new(800, 600), FieldConfig::hero(800))?;
//! let mut sim = Simulation::new(field, FixedRateScheduler::new(60.0));
//!
//! let stop = sim.stop_handle();
//! ctrlc_like_hook(move || stop.stop());
//!
//! let summary = sim.run();
//! println!("{} frames at {:.1} FPS", summary.frames, summary.fps);
//! ```
//!
//! The stop flag is checked at the top of every iteration, so a `stop()`
//! call ends the loop within one frame. Resize notifications are applied
//! between frames only. A failing frame stops the loop and is reported in
//! the [`RunSummary`] rather than panicking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{error, info};

use crate::animation::Animation;
use crate::error::FrameError;
use crate::resize::{ResizeSender, ResizeSignal};
use crate::scheduler::FrameScheduler;
use crate::time::FrameClock;

/// Shared flag that stops a running loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop before its next frame.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// [`StopHandle::stop`] was called.
    Stopped,
    /// The scheduler stopped issuing frames.
    HostClosed,
    /// A frame failed to draw.
    Failed(FrameError),
}

/// Statistics for a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Frames drawn during this run.
    pub frames: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Average frames per second.
    pub fps: f32,
    /// Why the loop ended.
    pub reason: StopReason,
}

/// An animation driven by a frame scheduler.
pub struct Simulation<A: Animation, F: FrameScheduler> {
    animation: A,
    scheduler: F,
    stop: StopHandle,
    resize: ResizeSignal,
}

impl<A: Animation, F: FrameScheduler> Simulation<A, F> {
    /// Create a stopped simulation.
    ///
    /// Resize notifications are debounced by the animation's quiet period.
    pub fn new(animation: A, scheduler: F) -> Self {
        let resize = ResizeSignal::new(animation.resize_quiet_period());
        Self {
            animation,
            scheduler,
            stop: StopHandle::new(),
            resize,
        }
    }

    /// Share an existing stop flag, e.g. one a scheduler hook already holds.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// A handle that stops the loop from anywhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// A handle for reporting surface size changes from anywhere.
    pub fn resize_sender(&self) -> ResizeSender {
        self.resize.sender()
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// Tear down, returning the animation and scheduler.
    pub fn into_parts(self) -> (A, F) {
        (self.animation, self.scheduler)
    }

    /// Run frames until stopped, the scheduler gives out, or a frame fails.
    pub fn run(&mut self) -> RunSummary {
        let mut clock = FrameClock::new();
        info!(
            "animation started with {} particles",
            self.animation.particle_count()
        );

        let reason = loop {
            if self.stop.is_stopped() {
                break StopReason::Stopped;
            }

            let Some(token) = self.scheduler.request_frame() else {
                break StopReason::HostClosed;
            };

            if self.stop.is_stopped() {
                self.scheduler.cancel(token);
                break StopReason::Stopped;
            }

            self.apply_pending_resize(Instant::now());

            if let Err(e) = self.animation.frame() {
                error!("stopping animation: {}", e);
                break StopReason::Failed(e);
            }
            clock.tick();
        };

        let summary = RunSummary {
            frames: clock.frames(),
            elapsed: clock.elapsed(),
            fps: clock.average_fps(),
            reason,
        };
        info!(
            "animation ended after {} frames ({:.1} FPS): {:?}",
            summary.frames, summary.fps, summary.reason
        );
        summary
    }

    fn apply_pending_resize(&mut self, now: Instant) {
        if let Some((width, height)) = self.resize.poll_at(now) {
            if let Err(e) = self.animation.resize(width, height) {
                error!("keeping previous surface size: {}", e);
            }
        }
    }
}

impl<A, F> Simulation<A, F>
where
    A: Animation + Send + 'static,
    F: FrameScheduler + Send + 'static,
{
    /// Run the loop on its own thread.
    pub fn start(mut self) -> RunningSimulation<A, F> {
        let stop = self.stop_handle();
        let resize = self.resize_sender();
        let thread = thread::spawn(move || {
            let summary = self.run();
            (self, summary)
        });

        RunningSimulation {
            stop,
            resize,
            thread,
        }
    }
}

/// A simulation running on a background thread.
pub struct RunningSimulation<A: Animation, F: FrameScheduler> {
    stop: StopHandle,
    resize: ResizeSender,
    thread: JoinHandle<(Simulation<A, F>, RunSummary)>,
}

impl<A: Animation, F: FrameScheduler> RunningSimulation<A, F> {
    /// Request the loop to stop before its next frame.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn resize_sender(&self) -> ResizeSender {
        self.resize.clone()
    }

    /// Whether the loop has ended.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to end, returning the simulation and its summary.
    pub fn join(self) -> thread::Result<(Simulation<A, F>, RunSummary)> {
        self.thread.join()
    }
}
