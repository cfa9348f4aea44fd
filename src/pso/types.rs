//! Swarm placement and velocity strategies, and the particle state.

use crate::fitness::Fitness;
use crate::solver::setup::halton_points;
use crate::solver::{Bounds, Point};
use rand::Rng;

/// Placement of the particles that are not seeded from hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwarmGenerator {
    /// Quasi-random Halton points, offset by the solve's random generator.
    #[default]
    Random,

    /// Evenly spaced points on the main diagonal of the box.
    Diagonal,

    /// Alternates between the main diagonal and its mirror, which flips
    /// every other dimension.
    CrossDiagonal,
}

impl SwarmGenerator {
    /// Places `count` particles into the box.
    pub fn generate<V: Point, R: Rng>(self, bounds: &Bounds, count: usize, rng: &mut R) -> Vec<V> {
        if self == SwarmGenerator::Random {
            return halton_points(bounds, count, rng);
        }

        let dim = bounds.dim();
        let mut unit = vec![0.0; dim];
        (0..count)
            .map(|k| {
                let t = (k + 1) as f64 / (count + 1) as f64;
                let mirrored = self == SwarmGenerator::CrossDiagonal && k % 2 == 1;
                for (i, u) in unit.iter_mut().enumerate() {
                    *u = if mirrored && i % 2 == 1 { 1.0 - t } else { t };
                }
                let mut p = V::filled(dim, 0.0);
                for (i, (x, &u)) in p.as_mut().iter_mut().zip(&unit).enumerate() {
                    *x = bounds.from_unit(i, u);
                }
                p
            })
            .collect()
    }
}

/// Source of the random factors `r1` (cognitive) and `r2` (social).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VelocityModifier {
    /// One draw shared by both terms and all dimensions.
    SharedScalar,

    /// One draw per term, shared by all dimensions.
    IndependentScalars,

    /// Independent draws per term and per dimension.
    #[default]
    IndependentVectors,
}

impl VelocityModifier {
    /// Fills `r1` and `r2` with factors in `[0, 1)`.
    pub fn draw<R: Rng>(self, rng: &mut R, r1: &mut [f64], r2: &mut [f64]) {
        match self {
            VelocityModifier::SharedScalar => {
                let r: f64 = rng.random();
                r1.fill(r);
                r2.fill(r);
            }
            VelocityModifier::IndependentScalars => {
                r1.fill(rng.random());
                r2.fill(rng.random());
            }
            VelocityModifier::IndependentVectors => {
                for (a, b) in r1.iter_mut().zip(r2.iter_mut()) {
                    *a = rng.random();
                    *b = rng.random();
                }
            }
        }
    }
}

/// A particle: position, velocity and personal best.
#[derive(Debug, Clone)]
pub(crate) struct Particle<V: Point> {
    pub position: V,
    pub velocity: V,
    pub fitness: Fitness,
    pub best_position: V,
    pub best_fitness: Fitness,
}

impl<V: Point> Particle<V> {
    pub fn new(position: V, velocity: V, objectives: usize) -> Self {
        Self {
            best_position: position.clone(),
            position,
            velocity,
            fitness: Fitness::failed(objectives),
            best_fitness: Fitness::failed(objectives),
        }
    }
}

/// A previously found optimum that pushes particles away.
#[derive(Debug, Clone)]
pub(crate) struct Repulsor {
    /// Center in unit-cube coordinates.
    pub center: Vec<f64>,
    /// Sub-searches left before it expires.
    pub remaining: usize,
}
