//! Registry entry type.

use crate::error::SolverError;
use crate::solver::{SolveOutcome, SolverProgress, SolverSetup};
use uuid::Uuid;

/// Entry point of a registered solver: runs it with dimension dispatch.
pub type SolveFn = fn(&SolverSetup, &SolverProgress) -> Result<SolveOutcome, SolverError>;

/// A registered solver.
#[derive(Clone, Copy)]
pub struct SolverDescriptor {
    /// Stable identifier callers dispatch on.
    pub id: Uuid,
    /// Short machine-friendly name, matching [`crate::solver::Solver::name`].
    pub name: &'static str,
    /// One-line human description.
    pub description: &'static str,
    pub(crate) solve: SolveFn,
}

impl SolverDescriptor {
    /// Runs the solver without the registry's panic guard.
    pub fn run(&self, setup: &SolverSetup, progress: &SolverProgress) -> Result<SolveOutcome, SolverError> {
        (self.solve)(setup, progress)
    }
}

impl std::fmt::Debug for SolverDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
