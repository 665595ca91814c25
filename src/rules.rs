//! Boundary rules for particles reaching the surface edge.
//!
//! A field uses exactly one [`Boundary`] for its whole lifetime:
//!
//! ```ignore
//! let config = FieldConfig::default().with_boundary(Boundary::Bounce);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// What happens to a particle that leaves the surface.
///
/// Both variants guarantee that after [`Boundary::apply`] the position lies
/// in `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Wrap around surface edges (toroidal topology).
    ///
    /// Particles exiting one side reappear on the opposite side with
    /// velocity preserved. Each coordinate is reduced modulo the surface
    /// extent, so overshoot carries over.
    #[default]
    Wrap,

    /// Reflect particles off surface edges.
    ///
    /// When a particle crosses an edge, its position is clamped inside the
    /// surface and its velocity component is turned back inward.
    Bounce,
}

impl Boundary {
    /// Bring a particle back inside a surface of the given size.
    ///
    /// `size` components must be positive.
    pub fn apply(self, particle: &mut Particle, size: Vec2) {
        match self {
            Boundary::Wrap => {
                particle.position.x = wrap_axis(particle.position.x, size.x);
                particle.position.y = wrap_axis(particle.position.y, size.y);
            }
            Boundary::Bounce => {
                bounce_axis(&mut particle.position.x, &mut particle.velocity.x, size.x);
                bounce_axis(&mut particle.position.y, &mut particle.velocity.y, size.y);
            }
        }
    }
}

fn wrap_axis(pos: f32, extent: f32) -> f32 {
    let wrapped = pos.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

fn bounce_axis(pos: &mut f32, vel: &mut f32, extent: f32) {
    if *pos < 0.0 {
        *pos = 0.0;
        *vel = vel.abs();
    } else if *pos >= extent {
        *pos = inner_edge(extent);
        *vel = -vel.abs();
    }
}

/// Largest `f32` strictly below a positive `extent`.
fn inner_edge(extent: f32) -> f32 {
    f32::from_bits(extent.to_bits() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_wrap_right_edge() {
        let mut p = Particle::new(Vec2::new(800.5, 300.0), Vec2::new(1.0, 0.0));
        Boundary::Wrap.apply(&mut p, SIZE);
        assert_eq!(p.position.x, 0.5);
        assert_eq!(p.velocity.x, 1.0);
    }

    #[test]
    fn test_wrap_left_edge() {
        let mut p = Particle::new(Vec2::new(-2.0, -1.0), Vec2::new(-1.0, -1.0));
        Boundary::Wrap.apply(&mut p, SIZE);
        assert_eq!(p.position, Vec2::new(798.0, 599.0));
    }

    #[test]
    fn test_wrap_tiny_negative_stays_in_bounds() {
        let mut p = Particle::new(Vec2::new(-1e-9, 10.0), Vec2::ZERO);
        Boundary::Wrap.apply(&mut p, SIZE);
        assert!(p.in_bounds(SIZE), "position {:?}", p.position);
    }

    #[test]
    fn test_bounce_flips_velocity() {
        let mut p = Particle::new(Vec2::new(-0.3, 601.0), Vec2::new(-0.5, 0.7));
        Boundary::Bounce.apply(&mut p, SIZE);

        assert_eq!(p.position.x, 0.0);
        assert!(p.velocity.x > 0.0);
        assert!(p.position.y < 600.0);
        assert!(p.velocity.y < 0.0);
        assert!(p.in_bounds(SIZE));
    }

    #[test]
    fn test_bounce_exact_edge_is_outside() {
        let mut p = Particle::new(Vec2::new(800.0, 0.0), Vec2::new(0.25, 0.0));
        Boundary::Bounce.apply(&mut p, SIZE);
        assert!(p.position.x < 800.0);
        assert!(p.position.x > 799.99);
        assert_eq!(p.velocity.x, -0.25);
    }

    #[test]
    fn test_inside_untouched() {
        for boundary in [Boundary::Wrap, Boundary::Bounce] {
            let mut p = Particle::new(Vec2::new(12.5, 40.0), Vec2::new(-1.0, 1.0));
            boundary.apply(&mut p, SIZE);
            assert_eq!(p.position, Vec2::new(12.5, 40.0));
            assert_eq!(p.velocity, Vec2::new(-1.0, 1.0));
        }
    }
}
