//! The particle type.

use glam::Vec2;

/// A drifting point in surface space.
///
/// Position and velocity change every frame; radius and opacity are fixed
/// when the particle is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in surface pixels.
    pub position: Vec2,
    /// Displacement per frame in pixels.
    pub velocity: Vec2,
    /// Circle radius in pixels.
    pub radius: f32,
    /// Fill opacity in 0.0-1.0.
    pub opacity: f32,
}

impl Particle {
    /// Create a particle with a 2px radius at half opacity.
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            radius: 2.0,
            opacity: 0.5,
        }
    }

    /// Set the radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the opacity, clamped to 0.0-1.0.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Move by one frame of velocity.
    #[inline]
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }

    /// Whether the position lies in `[0, size.x) x [0, size.y)`.
    #[inline]
    pub fn in_bounds(&self, size: Vec2) -> bool {
        self.position.x >= 0.0
            && self.position.x < size.x
            && self.position.y >= 0.0
            && self.position.y < size.y
    }
}
