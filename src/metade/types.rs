//! Mutation strategies and the self-adapting individual.

use crate::fitness::Fitness;
use crate::solver::Point;
use rand::Rng;

/// Mutation strategy owned by each individual.
///
/// Notation: `x` is the individual, `p` a member of the top-k set, `b` the
/// population best, `r1..r4` distinct random members, `F` the individual's
/// scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationStrategy {
    /// `x + F(p - x) + F(r1 - r2)`
    CurrentToPBest,

    /// As [`MutationStrategy::CurrentToPBest`], but every coordinate of `p`
    /// comes from an independently drawn top-k member.
    CurrentToUniformPBest,

    /// `b + F(r1 - r2) + F(r3 - r4)`
    Best2Bin,

    /// `p + F(r1 - r2)`
    UniformBest1,

    /// `x + K(r1 - x) + F(r2 - r3)` with `K` uniform in `[0, 1)`.
    CurrentToRand1,
}

impl MutationStrategy {
    /// Every strategy.
    pub const ALL: [MutationStrategy; 5] = [
        MutationStrategy::CurrentToPBest,
        MutationStrategy::CurrentToUniformPBest,
        MutationStrategy::Best2Bin,
        MutationStrategy::UniformBest1,
        MutationStrategy::CurrentToRand1,
    ];

    /// Number of random members the strategy consumes.
    pub fn random_members(self) -> usize {
        match self {
            MutationStrategy::Best2Bin => 4,
            MutationStrategy::CurrentToRand1 => 3,
            _ => 2,
        }
    }
}

/// An individual with its own meta-parameters.
#[derive(Debug, Clone)]
pub(crate) struct Individual<V: Point> {
    pub position: V,
    pub fitness: Fitness,
    pub cr: f64,
    pub f: f64,
    pub strategy: MutationStrategy,
}

/// Draws `count` distinct indices from `0..pool_size`, excluding `exclude`.
///
/// When the pool is too small the remaining slots repeat indices.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: usize,
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    use rand::seq::SliceRandom;

    let mut idxs: Vec<usize> = (0..pool_size).filter(|&i| i != exclude).collect();
    idxs.shuffle(rng);
    idxs.truncate(count);
    while idxs.len() < count {
        idxs.push(rng.random_range(0..pool_size));
    }
    idxs
}

/// Indices of the `k` best fitnesses, best first.
///
/// Insertion into a bounded list: `O(n k)` comparisons and no full sort of
/// the population. Only relies on "strictly better", so it stays well
/// defined for custom comparators that are not a total order.
pub(crate) fn top_k<F>(fitness: &[Fitness], k: usize, is_better: F) -> Vec<usize>
where
    F: Fn(&Fitness, &Fitness) -> bool,
{
    let k = k.min(fitness.len());
    let mut top: Vec<usize> = Vec::with_capacity(k + 1);
    for (i, f) in fitness.iter().enumerate() {
        let pos = top
            .iter()
            .position(|&j| is_better(f, &fitness[j]))
            .unwrap_or(top.len());
        if pos < k {
            top.insert(pos, i);
            top.truncate(k);
        }
    }
    top
}
