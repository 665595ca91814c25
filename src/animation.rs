//! The interface the run loop and the viewer drive.
//!
//! [`ParticleField`](crate::ParticleField) and
//! [`DriftField`](crate::DriftField) both draw one frame at a time through a
//! [`DrawingSurface`] and react to size changes; anything else that does
//! the same can be handed to a [`Simulation`](crate::Simulation).

use std::time::Duration;

use crate::error::{FieldError, FrameError};
use crate::field::ResizeOutcome;
use crate::surface::DrawingSurface;

/// A frame-by-frame animation drawn onto a surface.
pub trait Animation {
    /// The surface this animation draws on.
    type Surface: DrawingSurface;

    /// Advance and draw one frame.
    fn frame(&mut self) -> Result<(), FrameError>;

    /// Apply a new surface size between frames.
    fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, FieldError>;

    /// How long size changes must settle before [`Animation::resize`] is called.
    fn resize_quiet_period(&self) -> Duration;

    /// Number of particles being animated.
    fn particle_count(&self) -> usize;

    /// Frames drawn so far.
    fn frame_count(&self) -> u64;

    fn surface(&self) -> &Self::Surface;
}
