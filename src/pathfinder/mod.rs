//! Deterministic pathfinder samplers.
//!
//! Each generation places a cloud of samples around the current center
//! (on concentric spheres or along a golden-angle spiral), evaluates them,
//! and refines the best one with a per-dimension quadratic fit. The center
//! moves to the incumbent; the cloud widens after an improvement and
//! contracts otherwise. The search stops once the cloud has collapsed to a
//! single point or the generation budget is spent.

mod config;
mod runner;
mod types;

pub use config::{PathfinderConfig, DEFAULT_GENERATIONS, DEFAULT_SAMPLES};
pub use runner::PathfinderSolver;
pub use types::PathfinderVariant;
