//! Sequential coordinate scans.
//!
//! Both scans work one dimension at a time inside seeded regions: the whole
//! box when no hints are given, otherwise a sub-box around each hint.
//! Regions are stepped in parallel and their bests are merged through the
//! fitness comparator.
//!
//! - [`ConvexScanSolver`] runs a ternary search per dimension and assumes
//!   each one-dimensional slice is unimodal.
//! - [`BruteForceSolver`] evaluates a fixed grid per dimension and repeats
//!   passes until one brings no improvement.

mod brute_force;
mod config;
mod convex;
mod region;

pub use brute_force::BruteForceSolver;
pub use config::{
    ScanConfig, DEFAULT_BRUTE_FORCE_PASSES, DEFAULT_BRUTE_FORCE_STEPS, DEFAULT_CONVEX_ITERATIONS,
};
pub use convex::ConvexScanSolver;
