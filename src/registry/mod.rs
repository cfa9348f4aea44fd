//! Solver registry and dispatch surface.
//!
//! Callers that only know a solver's 128-bit identifier go through
//! [`solve`]: the identifier selects a registered solver, the problem
//! dimension selects a fixed-size point type (2, 4, 6 or 8 dimensions) or
//! the `Vec<f64>` fallback, and every failure comes back as a
//! [`Status`](crate::error::Status) code. Unknown identifiers yield
//! `NotImplemented`; panics inside a solve yield `Failed`.

mod engine;
mod table;
mod types;

pub use engine::{descriptors, find, solve, solve_detailed, solve_sized};
pub use table::{
    METADE, PATHFINDER_SPHERICAL, PATHFINDER_SPIRAL, PSO, REPULSIVE_PSO, SEQUENTIAL_BRUTE_FORCE,
    SEQUENTIAL_CONVEX,
};
pub use types::{SolveFn, SolverDescriptor};
