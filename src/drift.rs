//! Floating motes.
//!
//! A quieter sibling of the particle field: soft colored dots that sit at
//! random anchor points and slowly wander away from and back to them, with
//! no connection lines. Each mote waits out a random delay, then repeats an
//! outbound leg toward a random target near its anchor followed by a return
//! leg, both eased in and out over the mote's own duration. Opacity eases to
//! a new random value on every outbound leg and holds on the way back.
//!
//! Anchors and offsets are fractions of the surface size, so motes keep
//! their relative places when the surface is resized.
//!
//! ```ignore
//! let field = DriftField::new(PixelSurface::new(800, 600), DriftConfig::default())?;
//! let mut sim = Simulation::new(field, FixedRateScheduler::new(60.0));
//! sim.run();
//! ```

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::config::Interval;
use crate::error::{ConfigError, FieldError, FrameError, FrameStep, SurfaceError};
use crate::field::{acquire, ResizeOutcome};
use crate::spawn::SpawnContext;
use crate::surface::DrawingSurface;
use crate::visuals::Color;

/// Configuration for a [`DriftField`].
///
/// Durations are in simulated seconds; each frame advances the animation
/// by `1 / frame_rate` seconds regardless of how fast frames are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Number of motes.
    pub particle_count: u32,
    /// Each mote takes one color from here. The color's alpha is multiplied
    /// by the mote's opacity.
    pub palette: Vec<Color>,
    /// Mote diameter range in pixels.
    pub size: Interval,
    /// Length of each outbound and return leg, in seconds.
    pub duration: Interval,
    /// Wait before the first outbound leg, in seconds.
    pub delay: Interval,
    /// Targets lie within this fraction of the surface from the anchor, per axis.
    pub wander: f32,
    /// Opacity range for outbound legs.
    pub opacity: Interval,
    /// Halo width as a multiple of the mote diameter. Zero disables the halo.
    pub glow_scale: f32,
    /// Frames per simulated second.
    pub frame_rate: f32,
    /// Resize requests are applied after this many quiet milliseconds.
    pub resize_quiet_period_ms: u64,
    /// Color the surface is cleared to each frame.
    pub background: Color,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            particle_count: 80,
            palette: vec![
                Color::sand().with_alpha(0.5),
                Color::from_rgb8(97, 120, 145).with_alpha(0.4),
                Color::from_rgb8(111, 77, 56).with_alpha(0.3),
                Color::from_rgb8(99, 32, 36).with_alpha(0.3),
            ],
            size: Interval::new(2.0, 10.0),
            duration: Interval::new(20.0, 45.0),
            delay: Interval::new(0.0, 5.0),
            wander: 0.2,
            opacity: Interval::new(0.3, 0.8),
            glow_scale: 3.0,
            frame_rate: 60.0,
            resize_quiet_period_ms: 250,
            background: Color::TRANSPARENT,
        }
    }
}

impl DriftConfig {
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    /// Set the mote diameter range in pixels.
    pub fn with_size(mut self, min: f32, max: f32) -> Self {
        self.size = Interval::new(min, max);
        self
    }

    /// Set the leg length range in seconds.
    pub fn with_duration(mut self, min: f32, max: f32) -> Self {
        self.duration = Interval::new(min, max);
        self
    }

    /// Set the initial delay range in seconds.
    pub fn with_delay(mut self, min: f32, max: f32) -> Self {
        self.delay = Interval::new(min, max);
        self
    }

    pub fn with_wander(mut self, wander: f32) -> Self {
        self.wander = wander;
        self
    }

    pub fn with_opacity(mut self, min: f32, max: f32) -> Self {
        self.opacity = Interval::new(min, max);
        self
    }

    pub fn with_glow_scale(mut self, scale: f32) -> Self {
        self.glow_scale = scale;
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the resize debounce period.
    pub fn with_resize_quiet_period(mut self, period: Duration) -> Self {
        self.resize_quiet_period_ms = period.as_millis() as u64;
        self
    }

    /// Resize debounce period as a [`Duration`].
    pub fn resize_quiet_period(&self) -> Duration {
        Duration::from_millis(self.resize_quiet_period_ms)
    }

    /// Simulated seconds per frame.
    pub fn frame_step(&self) -> f32 {
        1.0 / self.frame_rate
    }

    /// Check the configuration for values that would break the animation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::ZeroParticles);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if !self.size.is_valid() {
            return Err(ConfigError::InvalidRange {
                field: "size",
                range: self.size,
            });
        }
        if !self.duration.is_valid() || self.duration.min <= 0.0 {
            return Err(ConfigError::InvalidRange {
                field: "duration",
                range: self.duration,
            });
        }
        if !self.delay.is_valid() {
            return Err(ConfigError::InvalidRange {
                field: "delay",
                range: self.delay,
            });
        }
        if !self.opacity.is_valid() || self.opacity.max > 1.0 {
            return Err(ConfigError::InvalidRange {
                field: "opacity",
                range: self.opacity,
            });
        }
        if !(self.glow_scale.is_finite() && self.glow_scale >= 0.0) {
            return Err(ConfigError::InvalidRange {
                field: "glow_scale",
                range: Interval::new(self.glow_scale, self.glow_scale),
            });
        }
        if !(0.0..=0.5).contains(&self.wander) {
            return Err(ConfigError::InvalidWander(self.wander));
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DriftConfig = serde_json::from_str(json)?;
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

/// Which leg of its cycle a mote is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftPhase {
    /// Sitting at the anchor until the initial delay runs out.
    Waiting,
    /// Easing toward a random target and a new opacity.
    Outbound,
    /// Easing back to the anchor, opacity held.
    Returning,
}

/// A single floating mote.
#[derive(Debug, Clone, PartialEq)]
pub struct Mote {
    /// Rest position as a fraction of the surface size.
    pub anchor: Vec2,
    /// Current displacement from the anchor as a fraction of the surface size.
    pub offset: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Current opacity, starting fully opaque.
    pub opacity: f32,
    /// Length of each leg in seconds.
    pub duration: f32,
    phase: DriftPhase,
    elapsed: f32,
    leg_length: f32,
    from: (Vec2, f32),
    to: (Vec2, f32),
}

impl Mote {
    fn new(anchor: Vec2, radius: f32, color: Color, duration: f32, delay: f32) -> Self {
        Self {
            anchor,
            offset: Vec2::ZERO,
            radius,
            color,
            opacity: 1.0,
            duration,
            phase: DriftPhase::Waiting,
            elapsed: 0.0,
            leg_length: delay,
            from: (Vec2::ZERO, 1.0),
            to: (Vec2::ZERO, 1.0),
        }
    }

    pub fn phase(&self) -> DriftPhase {
        self.phase
    }

    /// Center in pixels on a surface of `size`.
    pub fn position(&self, size: Vec2) -> Vec2 {
        (self.anchor + self.offset) * size
    }

    /// Advance by `dt` seconds, carrying leftover time into following legs.
    fn advance(&mut self, mut dt: f32, spawn: &mut SpawnContext, config: &DriftConfig) {
        while dt > 0.0 {
            let left = self.leg_length - self.elapsed;
            if dt < left {
                self.elapsed += dt;
                break;
            }
            dt -= left;
            self.next_leg(spawn, config);
            // a full out-and-back cycle lands on the same phase
            if self.phase != DriftPhase::Waiting {
                dt %= 2.0 * self.duration;
            }
        }

        let t = if self.leg_length > 0.0 {
            ease_in_out(self.elapsed / self.leg_length)
        } else {
            1.0
        };
        self.offset = self.from.0.lerp(self.to.0, t);
        self.opacity = self.from.1 + (self.to.1 - self.from.1) * t;
    }

    fn next_leg(&mut self, spawn: &mut SpawnContext, config: &DriftConfig) {
        self.offset = self.to.0;
        self.opacity = self.to.1;
        self.from = self.to;
        self.elapsed = 0.0;
        self.leg_length = self.duration;

        match self.phase {
            DriftPhase::Waiting | DriftPhase::Returning => {
                let unit = Vec2::new(spawn.random(), spawn.random()) - Vec2::splat(0.5);
                let target = unit * 2.0 * config.wander;
                self.to = (target, spawn.random_in(config.opacity));
                self.phase = DriftPhase::Outbound;
            }
            DriftPhase::Outbound => {
                self.to = (Vec2::ZERO, self.opacity);
                self.phase = DriftPhase::Returning;
            }
        }
    }
}

/// Smoothstep easing on `0..=1`.
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Floating motes animated on a drawing surface.
pub struct DriftField<S: DrawingSurface> {
    surface: S,
    config: DriftConfig,
    motes: Vec<Mote>,
    spawn: SpawnContext,
    size: Vec2,
    frame: u64,
}

impl<S: DrawingSurface> DriftField<S> {
    /// Build a field of randomly anchored motes.
    ///
    /// Fails like [`ParticleField::new`](crate::ParticleField::new) on a
    /// zero-area surface, a missing context or an invalid configuration.
    pub fn new(mut surface: S, config: DriftConfig) -> Result<Self, FieldError> {
        let size = acquire(&mut surface)?;
        Self::populate(surface, config, SpawnContext::from_entropy(size))
    }

    /// Like [`DriftField::new`], with a deterministic random source.
    pub fn with_seed(mut surface: S, config: DriftConfig, seed: u64) -> Result<Self, FieldError> {
        let size = acquire(&mut surface)?;
        Self::populate(surface, config, SpawnContext::seeded(size, seed))
    }

    fn populate(surface: S, config: DriftConfig, mut spawn: SpawnContext) -> Result<Self, FieldError> {
        config.validate()?;
        let motes = (0..config.particle_count)
            .map(|_| {
                let anchor = Vec2::new(spawn.random(), spawn.random());
                let radius = spawn.random_in(config.size) / 2.0;
                let color = spawn.pick(&config.palette).copied().unwrap_or_default();
                let duration = spawn.random_in(config.duration);
                let delay = spawn.random_in(config.delay);
                Mote::new(anchor, radius, color, duration, delay)
            })
            .collect::<Vec<_>>();
        debug!(
            "drift field: {} motes on {}x{} surface",
            motes.len(),
            spawn.size.x,
            spawn.size.y
        );

        Ok(Self {
            size: spawn.size,
            surface,
            config,
            motes,
            spawn,
            frame: 0,
        })
    }

    /// Advance every mote by one frame step and draw it.
    ///
    /// Each mote is drawn as a halo `diameter * glow_scale` pixels wide
    /// followed by a filled circle, both in the mote's color at its current
    /// opacity.
    pub fn frame(&mut self) -> Result<(), FrameError> {
        let frame = self.frame;
        let dt = self.config.frame_step();

        self.surface
            .clear(self.config.background)
            .map_err(|e| FrameError::new(frame, FrameStep::Clear, e))?;

        for mote in &mut self.motes {
            mote.advance(dt, &mut self.spawn, &self.config);
            draw_mote(&mut self.surface, mote, self.size, self.config.glow_scale)
                .map_err(|e| FrameError::new(frame, FrameStep::Particles, e))?;
        }

        self.frame += 1;
        Ok(())
    }

    /// Apply a new surface size. Motes keep their relative positions.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, FieldError> {
        if width == 0 || height == 0 {
            warn!("ignoring resize to {}x{}", width, height);
            return Ok(ResizeOutcome::Skipped);
        }

        self.surface.resize(width, height).map_err(FieldError::Resize)?;
        self.size = Vec2::new(width as f32, height as f32);
        self.spawn.size = self.size;
        debug!("resized to {}x{}", width, height);
        Ok(ResizeOutcome::Resized)
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Number of frames drawn so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Tear down the field, returning the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl<S: DrawingSurface> Animation for DriftField<S> {
    type Surface = S;

    fn frame(&mut self) -> Result<(), FrameError> {
        DriftField::frame(self)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, FieldError> {
        DriftField::resize(self, width, height)
    }

    fn resize_quiet_period(&self) -> Duration {
        self.config.resize_quiet_period()
    }

    fn particle_count(&self) -> usize {
        self.motes.len()
    }

    fn frame_count(&self) -> u64 {
        self.frame
    }

    fn surface(&self) -> &S {
        &self.surface
    }
}

fn draw_mote<S: DrawingSurface>(
    surface: &mut S,
    mote: &Mote,
    size: Vec2,
    glow_scale: f32,
) -> Result<(), SurfaceError> {
    let center = mote.position(size);
    let color = mote.color.with_alpha(mote.color.alpha * mote.opacity);
    if glow_scale > 0.0 {
        surface.fill_glow(center, mote.radius, mote.radius * 2.0 * glow_scale, color)?;
    }
    surface.fill_circle(center, mote.radius, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};

    fn one_second_frames(config: DriftConfig) -> DriftConfig {
        config.with_frame_rate(1.0)
    }

    #[test]
    fn test_new_spawns_motes_in_ranges() {
        let config = DriftConfig::default();
        let field = DriftField::with_seed(RecordingSurface::new(800, 600), config.clone(), 4).unwrap();

        assert_eq!(field.motes().len(), 80);
        for mote in field.motes() {
            assert!((0.0..1.0).contains(&mote.anchor.x) && (0.0..1.0).contains(&mote.anchor.y));
            assert!(mote.radius >= 1.0 && mote.radius < 5.0);
            assert!(mote.duration >= 20.0 && mote.duration < 45.0);
            assert!(config.palette.contains(&mote.color));
            assert_eq!(mote.offset, Vec2::ZERO);
            assert_eq!(mote.opacity, 1.0);
            assert_eq!(mote.phase(), DriftPhase::Waiting);
        }
    }

    #[test]
    fn test_waits_out_delay_before_moving() {
        let config = one_second_frames(DriftConfig::default())
            .with_particle_count(1)
            .with_delay(3.0, 3.0)
            .with_duration(10.0, 10.0);
        let mut field = DriftField::with_seed(RecordingSurface::new(100, 100), config, 8).unwrap();

        for _ in 0..3 {
            field.frame().unwrap();
            assert_eq!(field.motes()[0].offset, Vec2::ZERO);
        }
        assert_eq!(field.motes()[0].phase(), DriftPhase::Outbound);

        field.frame().unwrap();
        assert_ne!(field.motes()[0].offset, Vec2::ZERO);
    }

    #[test]
    fn test_outbound_eases_then_returns_to_anchor() {
        let config = one_second_frames(DriftConfig::default())
            .with_particle_count(1)
            .with_delay(0.0, 0.0)
            .with_duration(10.0, 10.0);
        let mut field = DriftField::with_seed(RecordingSurface::new(100, 100), config, 21).unwrap();

        for _ in 0..5 {
            field.frame().unwrap();
        }
        let halfway = field.motes()[0].offset;

        for _ in 5..10 {
            field.frame().unwrap();
        }
        let target = field.motes()[0].offset;
        let opacity = field.motes()[0].opacity;
        assert_eq!(field.motes()[0].phase(), DriftPhase::Returning);
        assert!((halfway - target * 0.5).length() < 1e-5);
        assert!((0.3..0.8).contains(&opacity));

        for _ in 10..15 {
            field.frame().unwrap();
        }
        assert_eq!(field.motes()[0].opacity, opacity);

        for _ in 15..20 {
            field.frame().unwrap();
        }
        assert_eq!(field.motes()[0].offset, Vec2::ZERO);
        assert_eq!(field.motes()[0].phase(), DriftPhase::Outbound);
    }

    #[test]
    fn test_offsets_stay_within_wander() {
        let config = one_second_frames(DriftConfig::default()).with_wander(0.1);
        let mut field = DriftField::with_seed(RecordingSurface::new(640, 480), config, 13).unwrap();

        for _ in 0..500 {
            field.frame().unwrap();
            field.surface_mut().take_commands();
            for mote in field.motes() {
                assert!(mote.offset.abs().max_element() <= 0.1 + 1e-6);
                assert!(mote.opacity >= 0.3 && mote.opacity <= 1.0);
            }
        }
        assert!(field.motes().iter().all(|m| m.opacity < 0.8));
    }

    #[test]
    fn test_large_frame_step_does_not_stall() {
        let config = DriftConfig::default()
            .with_particle_count(3)
            .with_duration(0.001, 0.002)
            .with_frame_rate(0.01);
        let mut field = DriftField::with_seed(RecordingSurface::new(100, 100), config, 2).unwrap();

        field.frame().unwrap();
        assert_eq!(field.frame_count(), 1);
    }

    #[test]
    fn test_glow_drawn_before_mote() {
        let config = DriftConfig::default().with_particle_count(1).with_glow_scale(3.0);
        let mut field = DriftField::with_seed(RecordingSurface::new(200, 100), config, 5).unwrap();
        field.frame().unwrap();

        let mote = field.motes()[0].clone();
        let center = mote.position(Vec2::new(200.0, 100.0));
        let color = mote.color.with_alpha(mote.color.alpha * mote.opacity);
        assert_eq!(
            field.surface().commands(),
            &[
                DrawCommand::Clear {
                    color: Color::TRANSPARENT
                },
                DrawCommand::Glow {
                    center,
                    radius: mote.radius,
                    blur: mote.radius * 6.0,
                    color,
                },
                DrawCommand::Circle {
                    center,
                    radius: mote.radius,
                    color,
                },
            ]
        );
    }

    #[test]
    fn test_zero_glow_scale_skips_halo() {
        let config = DriftConfig::default().with_particle_count(4).with_glow_scale(0.0);
        let mut field = DriftField::with_seed(RecordingSurface::new(200, 100), config, 5).unwrap();
        field.frame().unwrap();

        let glows = field
            .surface()
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glow { .. }))
            .count();
        assert_eq!(glows, 0);
        assert_eq!(field.surface().circles().count(), 4);
    }

    #[test]
    fn test_resize_keeps_relative_positions() {
        let mut field =
            DriftField::with_seed(RecordingSurface::new(400, 200), DriftConfig::default(), 9).unwrap();
        let before = field.motes()[0].position(field.size());

        assert_eq!(field.resize(0, 50).unwrap(), ResizeOutcome::Skipped);
        assert_eq!(field.resize(800, 100).unwrap(), ResizeOutcome::Resized);

        let after = field.motes()[0].position(field.size());
        assert!((after.x - before.x * 2.0).abs() < 1e-3);
        assert!((after.y - before.y * 0.5).abs() < 1e-3);
        assert_eq!(field.surface().size(), (800, 100));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = DriftConfig::default();
        assert!(base.validate().is_ok());
        assert!(matches!(
            base.clone().with_particle_count(0).validate(),
            Err(ConfigError::ZeroParticles)
        ));
        assert!(matches!(
            base.clone().with_palette(Vec::new()).validate(),
            Err(ConfigError::EmptyPalette)
        ));
        assert!(matches!(
            base.clone().with_duration(0.0, 5.0).validate(),
            Err(ConfigError::InvalidRange { field: "duration", .. })
        ));
        assert!(matches!(
            base.clone().with_opacity(0.5, 1.5).validate(),
            Err(ConfigError::InvalidRange { field: "opacity", .. })
        ));
        assert!(matches!(
            base.clone().with_wander(0.7).validate(),
            Err(ConfigError::InvalidWander(_))
        ));
        assert!(matches!(
            base.clone().with_frame_rate(0.0).validate(),
            Err(ConfigError::InvalidFrameRate(_))
        ));
        assert!(matches!(
            base.with_glow_scale(f32::NAN).validate(),
            Err(ConfigError::InvalidRange { field: "glow_scale", .. })
        ));
    }

    #[test]
    fn test_json_fills_missing_fields() {
        let config = DriftConfig::from_json_str(r#"{ "particle_count": 5, "wander": 0.1 }"#).unwrap();
        assert_eq!(config.particle_count, 5);
        assert_eq!(config.wander, 0.1);
        assert_eq!(config.palette.len(), 4);
        assert_eq!(config.duration, Interval::new(20.0, 45.0));

        assert!(DriftConfig::from_json_str(r#"{ "palette": [] }"#).is_err());
    }

    #[test]
    fn test_invalid_surface_rejected() {
        let result = DriftField::new(RecordingSurface::new(0, 10), DriftConfig::default());
        assert!(matches!(result, Err(FieldError::InvalidSurface(_))));
    }
}
