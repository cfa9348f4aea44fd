//! The "strictly better" relation between two fitness vectors.
//!
//! Comparison proceeds in stages and stops at the first one that decides:
//!
//! 1. Failed evaluations: a fitness with any invalid objective loses
//!    against a valid one.
//! 2. Single objective: plain `<` on the only value.
//! 3. Dominance: per-objective win counts judged by a
//!    [`DominanceStrategy`].
//! 4. Distance: both vectors reduced to a scalar by a [`DistanceMetric`];
//!    the smaller one wins.
//! 5. Lexicographic: the first differing objective decides.
//!
//! Identical vectors are never "better" than each other, so `compare(a, b)`
//! and `compare(b, a)` are never both true.

use super::{is_valid_value, Fitness};
use std::sync::Arc;

/// How per-objective win counts decide between two fitness vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DominanceStrategy {
    /// Decides only when one side is better on every objective.
    Strict,
    /// The side winning more objectives is better.
    Soft,
    /// Pareto dominance: the side that wins at least one objective and
    /// loses none is better. Mutually non-dominated pairs fall through to
    /// the distance metric.
    #[default]
    AnyNonDominated,
    /// Skip dominance and go straight to the distance metric.
    DistanceOnly,
}

/// Scalar reduction used when dominance does not decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMetric {
    /// Euclidean norm of the objective vector.
    #[default]
    Euclidean,
    /// Euclidean norm with objective `i` weighted by `count - i`, so earlier
    /// objectives weigh more.
    WeightedEuclidean,
    /// Symmetric ratio distance: `sum(a_i / (a_i + b_i))` against
    /// `sum(b_i / (a_i + b_i))`.
    Ratio,
    /// The largest single objective of each side.
    MaxObjective,
}

/// The built-in comparator: a dominance strategy plus a distance fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessComparator {
    /// Dominance stage.
    pub dominance: DominanceStrategy,
    /// Distance stage.
    pub distance: DistanceMetric,
}

impl FitnessComparator {
    /// Creates a comparator from both stages.
    pub fn new(dominance: DominanceStrategy, distance: DistanceMetric) -> Self {
        Self {
            dominance,
            distance,
        }
    }

    /// Returns `true` if `a` is strictly better than `b` on the first
    /// `objective_count` objectives.
    pub fn is_better(&self, a: &Fitness, b: &Fitness, objective_count: usize) -> bool {
        compare(a, b, objective_count, *self)
    }
}

/// Signature of a caller-supplied comparator: `true` if the first argument
/// is strictly better than the second.
pub type CustomComparator = Arc<dyn Fn(&Fitness, &Fitness) -> bool + Send + Sync>;

/// The comparison used by a solve: built-in or caller-supplied.
#[derive(Clone)]
pub enum Comparator {
    /// Use [`compare`] with the given strategy.
    Builtin(FitnessComparator),
    /// Use the caller's callback.
    Custom(CustomComparator),
}

impl Comparator {
    /// Returns `true` if `a` is strictly better than `b`.
    ///
    /// A custom comparator never sees failed evaluations: those are
    /// resolved before the callback is consulted.
    pub fn is_better(&self, a: &Fitness, b: &Fitness, objective_count: usize) -> bool {
        match self {
            Comparator::Builtin(c) => c.is_better(a, b, objective_count),
            Comparator::Custom(f) => match failure_order(a, b, objective_count) {
                Some(decided) => decided,
                None => f(a, b),
            },
        }
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Comparator::Builtin(FitnessComparator::default())
    }
}

impl std::fmt::Debug for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparator::Builtin(c) => f.debug_tuple("Builtin").field(c).finish(),
            Comparator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Stage 1: failed evaluations are always dominated.
fn failure_order(a: &Fitness, b: &Fitness, n: usize) -> Option<bool> {
    let a_ok = a.as_slice().iter().take(n).all(|&v| is_valid_value(v));
    let b_ok = b.as_slice().iter().take(n).all(|&v| is_valid_value(v));
    match (a_ok, b_ok) {
        (true, true) => None,
        (true, false) => Some(true),
        (false, _) => Some(false),
    }
}

/// Returns `true` if `a` is strictly better than `b`.
///
/// `objective_count` is clamped to the length of both vectors.
///
/// # Examples
///
/// ```
/// use u_fitsolve::fitness::{compare, Fitness, FitnessComparator};
///
/// let a = Fitness::from_slice(&[1.0, 1.0]).unwrap();
/// let b = Fitness::from_slice(&[2.0, 3.0]).unwrap();
/// assert!(compare(&a, &b, 2, FitnessComparator::default()));
/// assert!(!compare(&b, &a, 2, FitnessComparator::default()));
/// ```
pub fn compare(a: &Fitness, b: &Fitness, objective_count: usize, strategy: FitnessComparator) -> bool {
    let n = objective_count.min(a.len()).min(b.len());
    if n == 0 {
        return false;
    }

    if let Some(decided) = failure_order(a, b, n) {
        return decided;
    }

    let a = &a.as_slice()[..n];
    let b = &b.as_slice()[..n];

    if n == 1 {
        return a[0] < b[0];
    }

    let (a_wins, b_wins) = a.iter().zip(b).fold((0usize, 0usize), |(aw, bw), (x, y)| {
        if x < y {
            (aw + 1, bw)
        } else if y < x {
            (aw, bw + 1)
        } else {
            (aw, bw)
        }
    });

    if let Some(decided) = dominance(strategy.dominance, a_wins, b_wins, n) {
        return decided;
    }

    let (da, db) = distances(strategy.distance, a, b);
    if da < db {
        return true;
    }
    if db < da {
        return false;
    }

    // last resort: first differing objective
    for (x, y) in a.iter().zip(b) {
        if x < y {
            return true;
        }
        if y < x {
            return false;
        }
    }
    false
}

fn dominance(strategy: DominanceStrategy, a_wins: usize, b_wins: usize, n: usize) -> Option<bool> {
    match strategy {
        DominanceStrategy::Strict => {
            if a_wins == n {
                Some(true)
            } else if b_wins == n {
                Some(false)
            } else {
                None
            }
        }
        DominanceStrategy::Soft => {
            if a_wins > b_wins {
                Some(true)
            } else if b_wins > a_wins {
                Some(false)
            } else {
                None
            }
        }
        DominanceStrategy::AnyNonDominated => match (a_wins > 0, b_wins > 0) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        },
        DominanceStrategy::DistanceOnly => None,
    }
}

fn distances(metric: DistanceMetric, a: &[f64], b: &[f64]) -> (f64, f64) {
    match metric {
        DistanceMetric::Euclidean => (
            a.iter().map(|v| v * v).sum::<f64>().sqrt(),
            b.iter().map(|v| v * v).sum::<f64>().sqrt(),
        ),
        DistanceMetric::WeightedEuclidean => {
            let n = a.len();
            let weighted = |v: &[f64]| {
                v.iter()
                    .enumerate()
                    .map(|(i, x)| (n - i) as f64 * x * x)
                    .sum::<f64>()
                    .sqrt()
            };
            (weighted(a), weighted(b))
        }
        DistanceMetric::Ratio => a.iter().zip(b).fold((0.0, 0.0), |(da, db), (&x, &y)| {
            let sum = x + y;
            if sum == 0.0 || !sum.is_finite() {
                (da, db)
            } else {
                (da + x / sum, db + y / sum)
            }
        }),
        DistanceMetric::MaxObjective => (
            a.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            b.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ),
    }
}
