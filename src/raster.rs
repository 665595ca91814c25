//! Software RGBA framebuffer.
//!
//! [`PixelSurface`] rasterizes the field on the CPU with anti-aliased
//! circles and lines and source-over alpha blending. The windowed viewer
//! uploads its pixels to the GPU each frame; headless runs export them as
//! PNG.

use std::path::Path;

use glam::Vec2;

use crate::error::{ExportError, SurfaceError};
use crate::surface::DrawingSurface;
use crate::visuals::Color;

/// A CPU framebuffer implementing [`DrawingSurface`].
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
    detached: bool,
}

impl PixelSurface {
    /// Create a transparent framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; (width as usize) * (height as usize)],
            detached: false,
        }
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixels as a flat RGBA8 byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// The pixel at `(x, y)`, if inside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Make every later operation fail with [`SurfaceError::Detached`].
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Copy the framebuffer into an [`image::RgbaImage`].
    pub fn to_image(&self) -> Result<image::RgbaImage, ExportError> {
        image::RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
            .filter(|img| img.width() > 0 && img.height() > 0)
            .ok_or(ExportError::Empty)
    }

    /// Write the framebuffer to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn check(&self) -> Result<(), SurfaceError> {
        if self.detached {
            Err(SurfaceError::Detached)
        } else {
            Ok(())
        }
    }

    /// Pixel rows and columns overlapping `[min, max]`, clipped to the buffer.
    fn clip(&self, min: Vec2, max: Vec2) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().min(self.width as f32)) as u32;
        let y1 = (max.y.ceil().min(self.height as f32)) as u32;
        (x0..x1, y0..y1)
    }

    /// Blend `color` over the pixel at `(x, y)` with the given coverage.
    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let alpha = color.alpha * coverage.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let idx = self.index(x, y);
        let dst = self.pixels[idx];
        let src = color.to_rgba8();

        let dst_a = dst[3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        let mut out = [0u8; 4];
        if out_a > 0.0 {
            for c in 0..3 {
                let s = src[c] as f32;
                let d = dst[c] as f32;
                out[c] = ((s * alpha + d * dst_a * (1.0 - alpha)) / out_a).round() as u8;
            }
        }
        out[3] = (out_a * 255.0).round() as u8;
        self.pixels[idx] = out;
    }
}

impl DrawingSurface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn ensure_context(&mut self) -> Result<(), SurfaceError> {
        self.check()
    }

    fn clear(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.check()?;
        self.pixels.fill(color.to_rgba8());
        Ok(())
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError> {
        self.check()?;
        let reach = Vec2::splat(radius + 1.0);
        let (xs, ys) = self.clip(center - reach, center + reach);

        for y in ys {
            for x in xs.clone() {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = radius + 0.5 - p.distance(center);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
        Ok(())
    }

    fn fill_glow(
        &mut self,
        center: Vec2,
        radius: f32,
        blur: f32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.check()?;
        if blur <= 0.0 {
            return Ok(());
        }
        let outer = radius + blur;
        let reach = Vec2::splat(outer + 1.0);
        let (xs, ys) = self.clip(center - reach, center + reach);

        for y in ys {
            for x in xs.clone() {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = p.distance(center);
                if d >= outer {
                    continue;
                }
                // quadratic falloff from the particle edge outward
                let t = ((d - radius) / blur).clamp(0.0, 1.0);
                let falloff = (1.0 - t) * (1.0 - t);
                self.blend(x, y, color, falloff);
            }
        }
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    ) -> Result<(), SurfaceError> {
        self.check()?;
        let half = width * 0.5;
        let reach = Vec2::splat(half + 1.0);
        let (xs, ys) = self.clip(from.min(to) - reach, from.max(to) + reach);

        let seg = to - from;
        let len_sq = seg.length_squared();
        for y in ys {
            for x in xs.clone() {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dist = p.distance(from + seg * t);
                let coverage = half + 0.5 - dist;
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.check()?;
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroArea { width, height });
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![[0; 4]; (width as usize) * (height as usize)];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut surface = PixelSurface::new(4, 3);
        surface.clear(Color::sand()).unwrap();
        assert!(surface.pixels().iter().all(|&p| p == [213, 184, 147, 255]));
        assert_eq!(surface.as_bytes().len(), 4 * 3 * 4);
    }

    #[test]
    fn test_circle_covers_center_not_corner() {
        let mut surface = PixelSurface::new(20, 20);
        surface.clear(Color::BLACK).unwrap();
        surface
            .fill_circle(Vec2::new(10.0, 10.0), 3.0, Color::from_rgb8(255, 255, 255))
            .unwrap();

        assert_eq!(surface.pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_half_alpha_blend() {
        let mut surface = PixelSurface::new(8, 8);
        surface.clear(Color::BLACK).unwrap();
        surface
            .fill_circle(
                Vec2::new(4.0, 4.0),
                2.0,
                Color::from_rgb8(200, 100, 0).with_alpha(0.5),
            )
            .unwrap();

        let p = surface.pixel(4, 4).unwrap();
        assert_eq!(p, [100, 50, 0, 255]);
    }

    #[test]
    fn test_line_touches_pixels_along_segment() {
        let mut surface = PixelSurface::new(32, 8);
        surface
            .stroke_line(Vec2::new(2.0, 4.0), Vec2::new(30.0, 4.0), Color::sand(), 1.0)
            .unwrap();

        for x in 3..29 {
            let p = surface.pixel(x, 3).unwrap();
            let q = surface.pixel(x, 4).unwrap();
            assert!(p[3] > 0 || q[3] > 0, "no coverage at x={}", x);
        }
        assert_eq!(surface.pixel(16, 0).unwrap()[3], 0);
    }

    #[test]
    fn test_drawing_outside_is_clipped() {
        let mut surface = PixelSurface::new(10, 10);
        surface
            .fill_circle(Vec2::new(-50.0, -50.0), 5.0, Color::sand())
            .unwrap();
        surface
            .stroke_line(Vec2::new(-5.0, -5.0), Vec2::new(15.0, 15.0), Color::sand(), 2.0)
            .unwrap();
        assert!(surface.pixel(5, 5).unwrap()[3] > 0);
    }

    #[test]
    fn test_detached_surface_fails() {
        let mut surface = PixelSurface::new(10, 10);
        surface.detach();
        assert_eq!(surface.ensure_context(), Err(SurfaceError::Detached));
        assert_eq!(surface.clear(Color::BLACK), Err(SurfaceError::Detached));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut surface = PixelSurface::new(10, 10);
        surface.resize(30, 20).unwrap();
        assert_eq!(surface.size(), (30, 20));
        assert_eq!(surface.pixels().len(), 600);
        assert!(matches!(
            surface.resize(0, 20),
            Err(SurfaceError::ZeroArea { .. })
        ));
        assert_eq!(surface.size(), (30, 20));
    }

    #[test]
    fn test_to_image_dimensions() {
        let surface = PixelSurface::new(7, 5);
        let img = surface.to_image().unwrap();
        assert_eq!((img.width(), img.height()), (7, 5));
        assert!(matches!(PixelSurface::new(0, 5).to_image(), Err(ExportError::Empty)));
    }
}
