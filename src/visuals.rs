//! Visual configuration for particle field rendering.
//!
//! This module controls how particles and their connections appear,
//! separate from the configuration that controls how they move.
//!
//! # Usage
//!
//! ```ignore
//! let config = FieldConfig::default().with_visuals(|v| {
//!     v.particle_color(Color::from_rgb8(120, 200, 255))
//!      .line_opacity(0.25)
//!      .glow(8.0, Color::from_rgb8(120, 200, 255).with_alpha(0.6));
//! });
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An RGB color with alpha. All channels are in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red, green and blue channels.
    pub rgb: Vec3,
    /// Alpha channel.
    pub alpha: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::new(Vec3::ZERO, 1.0);

    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::new(Vec3::ZERO, 0.0);

    /// Create a color from RGB channels and alpha.
    pub const fn new(rgb: Vec3, alpha: f32) -> Self {
        Self { rgb, alpha }
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            Vec3::new(r as f32, g as f32, b as f32) / 255.0,
            1.0,
        )
    }

    /// The warm sand tone used by the built-in presets.
    pub fn sand() -> Self {
        Self::from_rgb8(213, 184, 147)
    }

    /// Same color with a different alpha, clamped to 0.0-1.0.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert to 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let rgb = (self.rgb.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        [
            rgb.x as u8,
            rgb.y as u8,
            rgb.z as u8,
            (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::sand()
    }
}

/// Soft halo drawn behind each particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    /// Width of the halo beyond the particle radius, in pixels.
    pub blur: f32,
    /// Halo color at the particle edge.
    pub color: Color,
}

/// Rendering options for a particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Particle fill color. The alpha is replaced by each particle's opacity.
    pub particle_color: Color,
    /// Connection line color. The alpha is derived from pair distance.
    pub line_color: Color,
    /// Connection line width in pixels.
    pub line_width: f32,
    /// Opacity of a connection between two coincident particles.
    pub line_opacity: f32,
    /// Optional halo behind particles.
    pub glow: Option<Glow>,
    /// Color the surface is cleared to each frame.
    pub background: Color,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            particle_color: Color::sand(),
            line_color: Color::sand(),
            line_width: 1.0,
            line_opacity: 0.3,
            glow: None,
            background: Color::TRANSPARENT,
        }
    }
}

impl VisualConfig {
    /// Set the particle fill color.
    pub fn particle_color(&mut self, color: Color) -> &mut Self {
        self.particle_color = color;
        self
    }

    /// Set the connection line color.
    pub fn line_color(&mut self, color: Color) -> &mut Self {
        self.line_color = color;
        self
    }

    /// Set the connection line width in pixels.
    pub fn line_width(&mut self, width: f32) -> &mut Self {
        self.line_width = width;
        self
    }

    /// Set the opacity of the closest possible connection.
    ///
    /// Lines fade linearly to zero as the pair approaches the
    /// connection distance.
    pub fn line_opacity(&mut self, opacity: f32) -> &mut Self {
        self.line_opacity = opacity;
        self
    }

    /// Draw a halo of `blur` pixels around each particle.
    pub fn glow(&mut self, blur: f32, color: Color) -> &mut Self {
        self.glow = Some(Glow { blur, color });
        self
    }

    /// Set the color the surface is cleared to.
    pub fn background(&mut self, color: Color) -> &mut Self {
        self.background = color;
        self
    }

    /// Line color for a pair `distance` apart with connection threshold `max_distance`.
    ///
    /// Opacity is `line_opacity * (1 - distance / max_distance)`.
    pub fn line_color_at(&self, distance: f32, max_distance: f32) -> Color {
        let alpha = self.line_opacity * (1.0 - distance / max_distance);
        self.line_color.with_alpha(alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sand_rgba8() {
        assert_eq!(Color::sand().to_rgba8(), [213, 184, 147, 255]);
    }

    #[test]
    fn test_line_color_fades_with_distance() {
        let visuals = VisualConfig::default();
        let near = visuals.line_color_at(0.0, 120.0);
        let mid = visuals.line_color_at(60.0, 120.0);
        let far = visuals.line_color_at(120.0, 120.0);

        assert!((near.alpha - 0.3).abs() < 1e-6);
        assert!((mid.alpha - 0.15).abs() < 1e-6);
        assert_eq!(far.alpha, 0.0);
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Color::sand().with_alpha(-0.5).alpha, 0.0);
        assert_eq!(Color::sand().with_alpha(3.0).alpha, 1.0);
    }
}
