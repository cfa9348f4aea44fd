//! Derivative-free, bound-constrained optimization for fitting model
//! parameters.
//!
//! The objective is an opaque, possibly expensive and possibly
//! multi-objective black box evaluated in batches. Every solver shares the
//! same contract:
//!
//! - candidates never leave the bounds, and fixed dimensions
//!   (`lower == upper`) are never perturbed;
//! - failed or non-finite evaluations become NaN fitness, which ranks worse
//!   than any valid candidate, instead of aborting the solve;
//! - cancellation is observed once per generation and returns the
//!   incumbent best with an `Aborted` status.
//!
//! Algorithms:
//!
//! - **Particle Swarm (PSO)**: pluggable swarm generators and velocity
//!   modifiers, with an optional repulsive multi-start mode.
//! - **MetaDE**: differential evolution in which every individual carries
//!   and evolves its own CR, F and mutation strategy.
//! - **Pathfinder**: deterministic spherical or spiral sampling around the
//!   incumbent with per-dimension quadratic refinement.
//! - **Sequential scans**: per-dimension ternary (convex) and grid
//!   (brute-force) searches over seeded regions.
//!
//! The [`halton`] module is also a standalone utility. [`halton::claim_prime`]
//! and [`halton::Halton::new`] hand out streams with process-unique prime
//! bases for callers that sample in parallel; the solvers themselves use the
//! reproducible [`halton::HaltonPoints::leading`] instead.
//!
//! Callers that select solvers at runtime go through [`registry::solve`],
//! keyed by 128-bit identifiers, which picks a fixed-size point type for
//! 2, 4, 6 and 8 dimensions and converts every failure into a
//! [`error::Status`] code.
//!
//! # Example
//!
//! ```
//! use u_fitsolve::pso::PsoSolver;
//! use u_fitsolve::solver::{FnObjective, Solver, SolverProgress, SolverSetup};
//!
//! let setup = SolverSetup::new(
//!     vec![0.0, 0.0],
//!     vec![1.0, 1.0],
//!     FnObjective::new(|x: &[f64]| (x[0] - 0.2).powi(2) + (x[1] - 0.9).powi(2)),
//! )
//! .unwrap()
//! .with_population_size(30)
//! .with_max_generations(100)
//! .with_seed(42);
//!
//! let outcome = PsoSolver::default()
//!     .solve::<[f64; 2]>(&setup, &SolverProgress::new())
//!     .unwrap();
//! assert!(outcome.best_metric() < 1e-4);
//! ```

pub mod error;
pub mod fitness;
pub mod halton;
pub mod logger;
pub mod metade;
pub mod pathfinder;
pub mod pso;
pub mod registry;
pub mod sequential;
pub mod solver;
