//! Identifier lookup, dimension dispatch and the fault boundary.

use super::table::SOLVERS;
use super::types::SolverDescriptor;
use crate::error::{SolverError, Status};
use crate::solver::{SolveOutcome, Solver, SolverProgress, SolverSetup};
use std::panic::{catch_unwind, AssertUnwindSafe};
use uuid::Uuid;

/// Every registered solver, in registration order.
pub fn descriptors() -> &'static [SolverDescriptor] {
    &SOLVERS
}

/// Looks up a solver by identifier.
pub fn find(id: &Uuid) -> Option<&'static SolverDescriptor> {
    SOLVERS.iter().find(|d| d.id == *id)
}

/// Runs `solver` on the point type matching the problem dimension:
/// `[f64; N]` for 2, 4, 6 and 8 dimensions, `Vec<f64>` otherwise.
pub fn solve_sized<S: Solver>(
    solver: &S,
    setup: &SolverSetup,
    progress: &SolverProgress,
) -> Result<SolveOutcome, SolverError> {
    match setup.dim() {
        2 => solver.solve::<[f64; 2]>(setup, progress),
        4 => solver.solve::<[f64; 4]>(setup, progress),
        6 => solver.solve::<[f64; 6]>(setup, progress),
        8 => solver.solve::<[f64; 8]>(setup, progress),
        _ => solver.solve::<Vec<f64>>(setup, progress),
    }
}

/// Runs the solver registered under `id` and returns its outcome.
///
/// Setup errors are reported before any evaluation. A panic raised by the
/// solver or the objective is caught here and becomes
/// [`SolverError::Internal`]; the best solution published before the fault
/// stays readable through `progress`.
pub fn solve_detailed(
    id: &Uuid,
    setup: &SolverSetup,
    progress: &SolverProgress,
) -> Result<SolveOutcome, SolverError> {
    let descriptor = find(id).ok_or(SolverError::NotImplemented(*id))?;
    setup.validate()?;

    let _span = tracing::debug_span!("dispatch", solver = descriptor.name, dim = setup.dim()).entered();
    match catch_unwind(AssertUnwindSafe(|| descriptor.run(setup, progress))) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(solver = descriptor.name, %message, "solver panicked");
            Err(SolverError::Internal(message))
        }
    }
}

/// Runs the solver registered under `id`, reporting only the status code.
///
/// The solution is read back from `progress` (see
/// [`SolverProgress::best_solution`]).
///
/// # Examples
///
/// ```
/// use u_fitsolve::error::Status;
/// use u_fitsolve::registry::{self, METADE};
/// use u_fitsolve::solver::{FnObjective, SolverProgress, SolverSetup};
///
/// let setup = SolverSetup::new(
///     vec![-5.0; 3],
///     vec![5.0; 3],
///     FnObjective::new(|x: &[f64]| x.iter().map(|v| v * v).sum()),
/// )
/// .unwrap()
/// .with_population_size(20)
/// .with_max_generations(50)
/// .with_seed(3);
///
/// let progress = SolverProgress::new();
/// assert_eq!(registry::solve(&METADE, &setup, &progress), Status::Ok);
/// assert!(progress.best_solution().is_some());
/// ```
pub fn solve(id: &Uuid, setup: &SolverSetup, progress: &SolverProgress) -> Status {
    match solve_detailed(id, setup, progress) {
        Ok(outcome) => outcome.status,
        Err(e) => {
            tracing::debug!(error = %e, "solve rejected");
            e.status()
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
