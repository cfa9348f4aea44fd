//! Particle Swarm Optimization (PSO).
//!
//! A swarm of particles moves through the box; each particle is pulled
//! toward its own best position and the swarm's best position. Swarm
//! placement ([`SwarmGenerator`]) and the random factors of the velocity
//! update ([`VelocityModifier`]) are pluggable.
//!
//! The optional repulsive mode ([`RepulsiveConfig`]) targets multi-modal
//! objectives: successive sub-searches are pushed away from optima found
//! earlier, and a final pass consolidates around all of them.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Clerc & Kennedy (2002), "The particle swarm: explosion, stability, and
//!   convergence in a multidimensional complex space"
//! - Parsopoulos & Vrahatis (2004), "On the computation of all global
//!   minimizers through particle swarm optimization"

mod config;
mod runner;
mod types;

pub use config::{PsoConfig, RepulsiveConfig, DEFAULT_GENERATIONS, DEFAULT_SWARM_SIZE};
pub use runner::PsoSolver;
pub use types::{SwarmGenerator, VelocityModifier};
