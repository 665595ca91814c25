//! Field configuration, presets and JSON loading.
//!
//! A [`FieldConfig`] is fixed for the lifetime of one field. Build one with
//! the chaining methods, start from a preset, or load it from JSON:
//!
//! ```ignore
//! let config = FieldConfig::hero(1280)
//!     .with_connection_distance(140.0)
//!     .with_boundary(Boundary::Bounce);
//!
//! let config = FieldConfig::load("field.json")?;
//! ```
//!
//! Every field in the JSON form is optional; missing fields take the
//! [`Default`] values (the wide hero preset).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::Boundary;
use crate::visuals::{Color, VisualConfig};

/// Surfaces narrower than this many pixels get the reduced particle count.
pub const NARROW_BREAKPOINT: u32 = 768;

/// A half-open range `min..max` that random values are drawn from.
///
/// A degenerate range with `min == max` always yields `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

/// Configuration for a [`ParticleField`](crate::ParticleField).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles (N).
    pub particle_count: u32,
    /// Pairs closer than this many pixels are connected (D).
    pub connection_distance: f32,
    /// Maximum connections per particle (M).
    pub max_connections: u32,
    /// Connections are recomputed every this many frames (K).
    pub refresh_interval: u32,
    /// Edge behavior.
    pub boundary: Boundary,
    /// Velocity components are drawn from `-speed..speed` pixels per frame.
    pub speed: f32,
    /// Particle radius range in pixels.
    pub radius: Interval,
    /// Particle opacity range.
    pub opacity: Interval,
    /// A resize that changes either dimension by more than this many pixels
    /// scatters the particles across the new bounds.
    pub reshuffle_threshold: u32,
    /// Resize requests are applied after this many quiet milliseconds.
    pub resize_quiet_period_ms: u64,
    /// Rendering options.
    pub visuals: VisualConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::hero(NARROW_BREAKPOINT)
    }
}

impl FieldConfig {
    /// Full-screen banner preset.
    ///
    /// 60 particles below [`NARROW_BREAKPOINT`], 100 otherwise; connections
    /// within 120px, at most 5 per particle, refreshed every 10 frames;
    /// particles wrap around the edges.
    pub fn hero(surface_width: u32) -> Self {
        Self {
            particle_count: if surface_width < NARROW_BREAKPOINT { 60 } else { 100 },
            connection_distance: 120.0,
            max_connections: 5,
            refresh_interval: 10,
            boundary: Boundary::Wrap,
            speed: 1.0,
            radius: Interval::new(1.0, 4.0),
            opacity: Interval::new(0.2, 0.7),
            reshuffle_threshold: 100,
            resize_quiet_period_ms: 250,
            visuals: VisualConfig::default(),
        }
    }

    /// Small card preset with glowing particles.
    ///
    /// 25 particles below [`NARROW_BREAKPOINT`], 35 otherwise; connections
    /// within 100px, at most 3 per particle, refreshed every 15 frames;
    /// particles bounce off the edges.
    pub fn hologram(surface_width: u32) -> Self {
        let mut visuals = VisualConfig::default();
        visuals
            .line_opacity(0.2)
            .glow(10.0, Color::sand().with_alpha(0.8));

        Self {
            particle_count: if surface_width < NARROW_BREAKPOINT { 25 } else { 35 },
            connection_distance: 100.0,
            max_connections: 3,
            refresh_interval: 15,
            boundary: Boundary::Bounce,
            speed: 0.25,
            radius: Interval::new(1.0, 3.0),
            opacity: Interval::new(0.3, 0.8),
            reshuffle_threshold: 100,
            resize_quiet_period_ms: 250,
            visuals,
        }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the connection distance threshold in pixels.
    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    /// Set the per-particle connection cap.
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Recompute connections every `frames` frames.
    pub fn with_refresh_interval(mut self, frames: u32) -> Self {
        self.refresh_interval = frames;
        self
    }

    /// Set the boundary rule.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the maximum velocity component in pixels per frame.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the particle radius range.
    pub fn with_radius(mut self, min: f32, max: f32) -> Self {
        self.radius = Interval::new(min, max);
        self
    }

    /// Set the particle opacity range.
    pub fn with_opacity(mut self, min: f32, max: f32) -> Self {
        self.opacity = Interval::new(min, max);
        self
    }

    /// Set the resize distance that triggers a reshuffle.
    pub fn with_reshuffle_threshold(mut self, pixels: u32) -> Self {
        self.reshuffle_threshold = pixels;
        self
    }

    /// Set the resize debounce period.
    pub fn with_resize_quiet_period(mut self, period: Duration) -> Self {
        self.resize_quiet_period_ms = period.as_millis() as u64;
        self
    }

    /// Configure rendering options.
    pub fn with_visuals<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut VisualConfig),
    {
        f(&mut self.visuals);
        self
    }

    /// Resize debounce period as a [`Duration`].
    pub fn resize_quiet_period(&self) -> Duration {
        Duration::from_millis(self.resize_quiet_period_ms)
    }

    /// Check the configuration for values that would break the field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::ZeroParticles);
        }
        if !(self.connection_distance.is_finite() && self.connection_distance > 0.0) {
            return Err(ConfigError::InvalidDistance(self.connection_distance));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::ZeroMaxConnections);
        }
        if self.refresh_interval == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if !self.radius.is_valid() {
            return Err(ConfigError::InvalidRange {
                field: "radius",
                range: self.radius,
            });
        }
        if !self.opacity.is_valid() || self.opacity.max > 1.0 {
            return Err(ConfigError::InvalidRange {
                field: "opacity",
                range: self.opacity,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_particle_count_by_width() {
        assert_eq!(FieldConfig::hero(375).particle_count, 60);
        assert_eq!(FieldConfig::hero(767).particle_count, 60);
        assert_eq!(FieldConfig::hero(768).particle_count, 100);
        assert_eq!(FieldConfig::hero(1920).particle_count, 100);
    }

    #[test]
    fn test_hologram_preset() {
        let config = FieldConfig::hologram(1024);
        assert_eq!(config.particle_count, 35);
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.refresh_interval, 15);
        assert_eq!(config.boundary, Boundary::Bounce);
        assert!(config.visuals.glow.is_some());
        assert_eq!(FieldConfig::hologram(320).particle_count, 25);
    }

    #[test]
    fn test_presets_validate() {
        assert!(FieldConfig::hero(1024).validate().is_ok());
        assert!(FieldConfig::hologram(1024).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = FieldConfig::default();

        assert!(matches!(
            base.clone().with_particle_count(0).validate(),
            Err(ConfigError::ZeroParticles)
        ));
        assert!(matches!(
            base.clone().with_connection_distance(0.0).validate(),
            Err(ConfigError::InvalidDistance(_))
        ));
        assert!(matches!(
            base.clone().with_connection_distance(f32::NAN).validate(),
            Err(ConfigError::InvalidDistance(_))
        ));
        assert!(matches!(
            base.clone().with_max_connections(0).validate(),
            Err(ConfigError::ZeroMaxConnections)
        ));
        assert!(matches!(
            base.clone().with_refresh_interval(0).validate(),
            Err(ConfigError::ZeroRefreshInterval)
        ));
        assert!(matches!(
            base.clone().with_radius(4.0, 1.0).validate(),
            Err(ConfigError::InvalidRange { field: "radius", .. })
        ));
        assert!(matches!(
            base.clone().with_opacity(0.5, 1.5).validate(),
            Err(ConfigError::InvalidRange { field: "opacity", .. })
        ));
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = FieldConfig::from_json_str(
            r#"{ "particle_count": 12, "boundary": "bounce" }"#,
        )
        .unwrap();

        assert_eq!(config.particle_count, 12);
        assert_eq!(config.boundary, Boundary::Bounce);
        assert_eq!(config.connection_distance, 120.0);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_json_round_trip_preserves_preset() {
        let config = FieldConfig::hologram(1024);
        let json = config.to_json().unwrap();
        assert_eq!(FieldConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        let err = FieldConfig::from_json_str(r#"{ "max_connections": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMaxConnections));

        let err = FieldConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
