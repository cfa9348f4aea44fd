//! Self-adaptive Differential Evolution ("MetaDE").
//!
//! Every individual carries its own crossover rate, scale factor and
//! mutation strategy. A trial vector replaces its parent only when strictly
//! better; an individual whose trial fails redraws all three parameters, so
//! settings that work survive and settings that stall are discarded.
//!
//! # References
//!
//! - Storn & Price (1997), "Differential Evolution: A Simple and Efficient
//!   Heuristic for Global Optimization over Continuous Spaces"
//! - Brest et al. (2006), "Self-Adapting Control Parameters in Differential
//!   Evolution" (jDE)
//! - Zhang & Sanderson (2009), "JADE: Adaptive Differential Evolution with
//!   Optional External Archive" (current-to-pbest)

mod config;
mod runner;
mod types;

pub use config::{MetaDeConfig, DEFAULT_GENERATIONS, DEFAULT_POPULATION, MIN_POPULATION};
pub use runner::MetaDeSolver;
pub use types::MutationStrategy;
