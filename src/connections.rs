//! Proximity connections between particles.
//!
//! Connections are recomputed every few frames by an all-pairs scan and
//! reused in between. Each particle takes part in at most
//! `max_connections` connections, which bounds the number of lines drawn
//! regardless of how densely particles cluster.

use crate::particle::Particle;

/// Two particles that were within the connection distance at the last
/// recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the first particle. Always less than `b`.
    pub a: usize,
    /// Index of the second particle.
    pub b: usize,
    /// Squared distance at recomputation time.
    pub distance_sq: f32,
}

impl Connection {
    /// Distance at recomputation time.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance_sq.sqrt()
    }
}

/// The connections found by one recomputation.
///
/// Holds both the edge list (for drawing) and per-particle adjacency
/// lists (for degree queries). Always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionSet {
    edges: Vec<Connection>,
    adjacency: Vec<Vec<usize>>,
}

impl ConnectionSet {
    /// A set with no connections for `particle_count` particles.
    pub fn empty(particle_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); particle_count],
        }
    }

    /// Scan all pairs and connect those strictly closer than `max_distance`.
    ///
    /// Particles are visited in index order; each scans only higher indices.
    /// A pair is connected only if both particles are still below
    /// `max_connections`, and a particle stops scanning once it reaches the
    /// cap.
    pub fn compute(particles: &[Particle], max_distance: f32, max_connections: u32) -> Self {
        let max_distance_sq = max_distance * max_distance;
        let cap = max_connections as usize;
        let mut set = Self::empty(particles.len());

        for (i, p1) in particles.iter().enumerate() {
            for (j, p2) in particles.iter().enumerate().skip(i + 1) {
                if set.adjacency[i].len() >= cap {
                    break;
                }
                if set.adjacency[j].len() >= cap {
                    continue;
                }

                let distance_sq = p1.position.distance_squared(p2.position);
                if distance_sq < max_distance_sq {
                    set.adjacency[i].push(j);
                    set.adjacency[j].push(i);
                    set.edges.push(Connection {
                        a: i,
                        b: j,
                        distance_sq,
                    });
                }
            }
        }

        set
    }

    /// Number of connections.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether there are no connections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All connections in discovery order.
    pub fn edges(&self) -> &[Connection] {
        &self.edges
    }

    /// Iterate over all connections.
    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.edges.iter()
    }

    /// Indices of the particles connected to `index`.
    ///
    /// Empty for out-of-range indices.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of connections of particle `index`.
    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    /// Whether particles `a` and `b` are connected, in either order.
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).contains(&b)
    }
}

impl<'a> IntoIterator for &'a ConnectionSet {
    type Item = &'a Connection;
    type IntoIter = std::slice::Iter<'a, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn at(points: &[(f32, f32)]) -> Vec<Particle> {
        points
            .iter()
            .map(|&(x, y)| Particle::new(Vec2::new(x, y), Vec2::ZERO))
            .collect()
    }

    #[test]
    fn test_two_close_one_far() {
        let particles = at(&[(0.0, 0.0), (5.0, 0.0), (1000.0, 1000.0)]);
        let set = ConnectionSet::compute(&particles, 10.0, 5);

        assert_eq!(set.len(), 1);
        assert!(set.contains(0, 1));
        assert!(set.contains(1, 0));
        assert_eq!(set.degree(2), 0);
        assert_eq!(set.edges()[0].distance(), 5.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let exact = at(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(ConnectionSet::compute(&exact, 10.0, 5).is_empty());

        let inside = at(&[(0.0, 0.0), (10.0 - 1e-3, 0.0)]);
        assert!(ConnectionSet::compute(&inside, 10.0, 5).contains(0, 1));
    }

    #[test]
    fn test_cap_holds_in_dense_cluster() {
        // 12 particles within a 4px square, all mutually in range
        let points: Vec<(f32, f32)> = (0..12).map(|i| ((i % 4) as f32, (i / 4) as f32)).collect();
        let particles = at(&points);
        let set = ConnectionSet::compute(&particles, 50.0, 3);

        for i in 0..particles.len() {
            assert!(set.degree(i) <= 3, "particle {} has {} connections", i, set.degree(i));
        }
        assert_eq!(set.degree(0), 3);
    }

    #[test]
    fn test_cap_holds_for_random_fields() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let particles: Vec<Particle> = (0..80)
                .map(|_| {
                    Particle::new(
                        Vec2::new(rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0)),
                        Vec2::ZERO,
                    )
                })
                .collect();
            let set = ConnectionSet::compute(&particles, 60.0, 5);

            for i in 0..particles.len() {
                assert!(set.degree(i) <= 5);
            }
            for c in &set {
                assert!(c.a < c.b);
                assert!(c.distance_sq < 3600.0);
            }
        }
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut rng = SmallRng::seed_from_u64(11);
        let particles: Vec<Particle> = (0..50)
            .map(|_| {
                Particle::new(
                    Vec2::new(rng.gen_range(0.0..300.0), rng.gen_range(0.0..300.0)),
                    Vec2::ZERO,
                )
            })
            .collect();

        let first = ConnectionSet::compute(&particles, 80.0, 4);
        let second = ConnectionSet::compute(&particles, 80.0, 4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_adjacency_matches_edges() {
        let particles = at(&[(0.0, 0.0), (3.0, 0.0), (6.0, 0.0), (9.0, 0.0)]);
        let set = ConnectionSet::compute(&particles, 4.0, 5);

        let degree_sum: usize = (0..4).map(|i| set.degree(i)).sum();
        assert_eq!(degree_sum, set.len() * 2);
        assert_eq!(set.neighbors(1), &[0, 2]);
        assert!(set.neighbors(99).is_empty());
    }
}
