//! The particle field animator.
//!
//! A [`ParticleField`] owns a fixed set of particles and a drawing surface.
//! Each call to [`ParticleField::frame`] moves every particle, draws it, and
//! strokes lines between nearby pairs. Connections are recomputed only every
//! `refresh_interval` frames and reused in between, since particles drift
//! only a few pixels per frame.
//!
//! ```ignore
//! let surface = PixelSurface::new(1280, 720);
//! let mut field = ParticleField::new(surface, FieldConfig::hero(1280))?;
//!
//! for _ in 0..600 {
//!     field.frame()?;
//! }
//! ```

use std::time::Duration;

use glam::Vec2;
use log::{debug, warn};

use crate::animation::Animation;
use crate::config::FieldConfig;
use crate::connections::ConnectionSet;
use crate::error::{FieldError, FrameError, FrameStep, SurfaceError};
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::surface::DrawingSurface;

/// What a call to [`ParticleField::resize`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The new size had a zero dimension and was ignored.
    Skipped,
    /// The surface was resized and particles kept their positions.
    Resized,
    /// The size changed enough that particles were scattered anew.
    Reshuffled,
}

/// A fixed set of particles animated on a drawing surface.
pub struct ParticleField<S: DrawingSurface> {
    surface: S,
    config: FieldConfig,
    particles: Vec<Particle>,
    connections: ConnectionSet,
    spawn: SpawnContext,
    size: Vec2,
    frame: u64,
}

impl<S: DrawingSurface> ParticleField<S> {
    /// Build a field with randomly placed particles.
    ///
    /// Fails with [`FieldError::InvalidSurface`] if the surface has zero area
    /// or no drawing context, and with [`FieldError::InvalidConfig`] if the
    /// configuration does not validate.
    pub fn new(mut surface: S, config: FieldConfig) -> Result<Self, FieldError> {
        let size = acquire(&mut surface)?;
        Self::populate(surface, config, SpawnContext::from_entropy(size))
    }

    /// Like [`ParticleField::new`], with a deterministic random source.
    pub fn with_seed(mut surface: S, config: FieldConfig, seed: u64) -> Result<Self, FieldError> {
        let size = acquire(&mut surface)?;
        Self::populate(surface, config, SpawnContext::seeded(size, seed))
    }

    /// Build a field around caller-provided particles.
    ///
    /// The particle count of `config` is replaced by `particles.len()`.
    /// Particles outside the surface are brought inside by the boundary rule.
    pub fn from_particles(
        mut surface: S,
        mut config: FieldConfig,
        mut particles: Vec<Particle>,
    ) -> Result<Self, FieldError> {
        let size = acquire(&mut surface)?;
        config.particle_count = particles.len() as u32;
        config.validate()?;

        for p in &mut particles {
            config.boundary.apply(p, size);
        }

        Ok(Self {
            connections: ConnectionSet::empty(particles.len()),
            spawn: SpawnContext::from_entropy(size),
            surface,
            config,
            particles,
            size,
            frame: 0,
        })
    }

    fn populate(surface: S, config: FieldConfig, mut spawn: SpawnContext) -> Result<Self, FieldError> {
        config.validate()?;
        let particles = spawn.batch(&config);
        debug!(
            "particle field: {} particles on {}x{} surface, {:?} boundary",
            particles.len(),
            spawn.size.x,
            spawn.size.y,
            config.boundary
        );

        Ok(Self {
            connections: ConnectionSet::empty(particles.len()),
            size: spawn.size,
            surface,
            config,
            particles,
            spawn,
            frame: 0,
        })
    }

    /// Advance and draw one frame.
    ///
    /// Clears the surface, moves and draws every particle, recomputes
    /// connections on every `refresh_interval`-th frame, then strokes a line
    /// for each connection. Line opacity fades linearly with the pair's
    /// distance at recomputation time.
    pub fn frame(&mut self) -> Result<(), FrameError> {
        let frame = self.frame;
        let visuals = &self.config.visuals;
        let boundary = self.config.boundary;
        let size = self.size;

        self.surface
            .clear(visuals.background)
            .map_err(|e| FrameError::new(frame, FrameStep::Clear, e))?;

        for p in &mut self.particles {
            p.advance();
            boundary.apply(p, size);
            draw_particle(&mut self.surface, p, &self.config)
                .map_err(|e| FrameError::new(frame, FrameStep::Particles, e))?;
        }

        if frame % self.config.refresh_interval as u64 == 0 {
            self.recompute_connections();
        }

        let max_distance = self.config.connection_distance;
        let visuals = &self.config.visuals;
        for c in &self.connections {
            let color = visuals.line_color_at(c.distance(), max_distance);
            if color.alpha <= 0.0 {
                continue;
            }
            let from = self.particles[c.a].position;
            let to = self.particles[c.b].position;
            self.surface
                .stroke_line(from, to, color, visuals.line_width)
                .map_err(|e| FrameError::new(frame, FrameStep::Connections, e))?;
        }

        self.frame += 1;
        Ok(())
    }

    /// Recompute connections from the current positions now.
    ///
    /// The new set replaces the old one in a single assignment.
    pub fn recompute_connections(&mut self) {
        self.connections = ConnectionSet::compute(
            &self.particles,
            self.config.connection_distance,
            self.config.max_connections,
        );
    }

    /// Apply a new surface size.
    ///
    /// A zero dimension is skipped. If either dimension changes by more than
    /// `reshuffle_threshold` pixels, particles are scattered across the new
    /// bounds and connections recomputed; otherwise positions are kept and
    /// wrapped or clamped into the new bounds.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, FieldError> {
        if width == 0 || height == 0 {
            warn!("ignoring resize to {}x{}", width, height);
            return Ok(ResizeOutcome::Skipped);
        }

        self.surface.resize(width, height).map_err(FieldError::Resize)?;

        let old = self.size;
        let new = Vec2::new(width as f32, height as f32);
        self.size = new;
        self.spawn.size = new;

        let threshold = self.config.reshuffle_threshold as f32;
        if (new - old).abs().max_element() > threshold {
            for p in &mut self.particles {
                p.position = self.spawn.random_position();
            }
            self.recompute_connections();
            debug!("resized to {}x{}, particles reshuffled", width, height);
            Ok(ResizeOutcome::Reshuffled)
        } else {
            for p in &mut self.particles {
                self.config.boundary.apply(p, new);
            }
            debug!("resized to {}x{}", width, height);
            Ok(ResizeOutcome::Resized)
        }
    }

    /// The particles in creation order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Connections from the most recent recomputation.
    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    /// The configuration this field was built with.
    pub fn config(&self) -> &FieldConfig {
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

impl<S: DrawingSurface> Animation for ParticleField<S> {
    type Surface = S;

    fn frame(&mut self) -> Result<(), FrameError> {
        ParticleField::frame(self)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, FieldError> {
        ParticleField::resize(self, width, height)
    }

    fn resize_quiet_period(&self) -> Duration {
        self.config.resize_quiet_period()
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn frame_count(&self) -> u64 {
        self.frame
    }

    fn surface(&self) -> &S {
        &self.surface
    }
}

/// Size of a surface that is ready to draw on.
pub(crate) fn acquire<S: DrawingSurface>(surface: &mut S) -> Result<Vec2, FieldError> {
    let (width, height) = surface.size();
    if width == 0 || height == 0 {
        return Err(FieldError::InvalidSurface(SurfaceError::ZeroArea { width, height }));
    }
    surface.ensure_context().map_err(FieldError::InvalidSurface)?;
    Ok(Vec2::new(width as f32, height as f32))
}

fn draw_particle<S: DrawingSurface>(
    surface: &mut S,
    particle: &Particle,
    config: &FieldConfig,
) -> Result<(), SurfaceError> {
    let visuals = &config.visuals;
    if let Some(glow) = &visuals.glow {
        surface.fill_glow(particle.position, particle.radius, glow.blur, glow.color)?;
    }
    surface.fill_circle(
        particle.position,
        particle.radius,
        visuals.particle_color.with_alpha(particle.opacity),
    )
}
