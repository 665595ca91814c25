//! The drawing surface abstraction.
//!
//! A [`DrawingSurface`] is a 2D pixel buffer with a handful of primitives.
//! The field never touches pixels directly, so anything from a software
//! framebuffer ([`PixelSurface`](crate::PixelSurface)) to a call recorder
//! ([`RecordingSurface`](crate::RecordingSurface)) can sit underneath it.

use glam::Vec2;

use crate::error::SurfaceError;
use crate::visuals::Color;

/// A 2D surface the field draws onto.
///
/// Every drawing operation can fail, for example when the surface is
/// detached from its host mid-animation. The field turns such failures into
/// a [`FrameError`](crate::FrameError) instead of panicking.
pub trait DrawingSurface {
    /// Current size of the backing buffer in pixels, `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Check that the surface can produce a drawing context.
    ///
    /// Called once when a field is built.
    fn ensure_context(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Clear the whole surface to `color`.
    fn clear(&mut self, color: Color) -> Result<(), SurfaceError>;

    /// Fill a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError>;

    /// Draw a soft halo extending `blur` pixels beyond `radius`.
    ///
    /// Surfaces without blur support may ignore it.
    fn fill_glow(
        &mut self,
        _center: Vec2,
        _radius: f32,
        _blur: f32,
        _color: Color,
    ) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Stroke a straight line segment.
    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    ) -> Result<(), SurfaceError>;

    /// Reallocate the backing buffer at a new size.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;
}

impl<S: DrawingSurface + ?Sized> DrawingSurface for Box<S> {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn ensure_context(&mut self) -> Result<(), SurfaceError> {
        (**self).ensure_context()
    }

    fn clear(&mut self, color: Color) -> Result<(), SurfaceError> {
        (**self).clear(color)
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError> {
        (**self).fill_circle(center, radius, color)
    }

    fn fill_glow(
        &mut self,
        center: Vec2,
        radius: f32,
        blur: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        (**self).fill_glow(center, radius, blur, color)
    }

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    ) -> Result<(), SurfaceError> {
        (**self).stroke_line(from, to, color, width)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        (**self).resize(width, height)
    }
}
