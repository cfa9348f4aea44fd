//! The solver contract.
//!
//! Every algorithm consumes the same [`SolverSetup`] (bounds, hints,
//! objective, sizing), reports through a shared [`SolverProgress`], and
//! returns a [`SolveOutcome`]. Guarantees common to all solvers:
//!
//! - every evaluated and returned candidate lies inside the bounds
//! - the objective is called in batches; a failed batch scores `NaN`
//! - cancellation is observed once per generation and keeps the incumbent
//! - the incumbent fitness never worsens across generations

mod bounds;
pub(crate) mod evaluate;
pub mod point;
mod progress;
pub(crate) mod setup;

pub use bounds::Bounds;
pub use point::Point;
pub use progress::{BestSnapshot, SolverProgress};
pub use setup::{FnObjective, MultiFnObjective, Objective, SolverSetup};

use crate::error::{SolverError, Status};
use crate::fitness::Fitness;

/// Result of a solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveOutcome {
    /// The best candidate found, inside bounds.
    pub solution: Vec<f64>,

    /// Fitness of `solution`. `NaN` only if no evaluation ever succeeded.
    pub fitness: Fitness,

    /// [`Status::Ok`] or [`Status::Aborted`].
    pub status: Status,

    /// Generations completed.
    pub generations: usize,

    /// Number of candidates handed to the objective.
    pub evaluations: usize,

    /// Incumbent fitness after initialization and after each generation.
    pub history: Vec<Fitness>,

    /// Positions of the non-dominated candidates of the final population.
    /// Empty for single-objective solves.
    pub pareto_front: Vec<Vec<f64>>,
}

impl SolveOutcome {
    /// First objective of the best fitness.
    pub fn best_metric(&self) -> f64 {
        self.fitness.primary()
    }

    /// Returns `true` if the solve was cancelled.
    pub fn cancelled(&self) -> bool {
        self.status == Status::Aborted
    }
}

/// A bound-constrained optimization algorithm.
///
/// `V` selects the candidate representation: `[f64; N]` for small problems
/// with a compile-time dimension, `Vec<f64>` otherwise.
pub trait Solver: Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Runs the solve to completion, cancellation or convergence.
    fn solve<V: Point>(
        &self,
        setup: &SolverSetup,
        progress: &SolverProgress,
    ) -> Result<SolveOutcome, SolverError>;
}
