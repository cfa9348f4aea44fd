//! The static table of registered solvers.

use super::engine::solve_sized;
use super::types::SolverDescriptor;
use crate::error::SolverError;
use crate::metade::MetaDeSolver;
use crate::pathfinder::PathfinderSolver;
use crate::pso::PsoSolver;
use crate::sequential::{BruteForceSolver, ConvexScanSolver};
use crate::solver::{SolveOutcome, SolverProgress, SolverSetup};
use uuid::Uuid;

/// Particle swarm with default settings.
pub const PSO: Uuid = Uuid::from_u128(0x5c1e_8a0f_2b7d_4c31_9e64_0a8b_3f5d_7c01);
/// Particle swarm with repulsive restarts.
pub const REPULSIVE_PSO: Uuid = Uuid::from_u128(0x5c1e_8a0f_2b7d_4c31_9e64_0a8b_3f5d_7c02);
/// Self-adaptive differential evolution.
pub const METADE: Uuid = Uuid::from_u128(0x5c1e_8a0f_2b7d_4c31_9e64_0a8b_3f5d_7c03);
/// Pathfinder with concentric spherical sampling.
pub const PATHFINDER_SPHERICAL: Uuid = Uuid::from_u128(0x5c1e_8a0f_2b7d_4c31_9e64_0a8b_3f5d_7c04);
/// Pathfinder with golden-angle spiral sampling.
pub const PATHFINDER_SPIRAL: Uuid = Uuid::from_u128(0x5c1e_8a0f_2b7d_4c31_9e64_0a8b_3f5d_7c05);
/// Per-dimension ternary scan.
pub const SEQUENTIAL_CONVEX: Uuid = Uuid::from_u128(0x5c1e_8a0f_2b7d_4c31_9e64_0a8b_3f5d_7c06);
/// Per-dimension grid scan.
pub const SEQUENTIAL_BRUTE_FORCE: Uuid = Uuid::from_u128(0x5c1e_8a0f_2b7d_4c31_9e64_0a8b_3f5d_7c07);

fn pso(setup: &SolverSetup, progress: &SolverProgress) -> Result<SolveOutcome, SolverError> {
    solve_sized(&PsoSolver::default(), setup, progress)
}

fn repulsive_pso(setup: &SolverSetup, progress: &SolverProgress) -> Result<SolveOutcome, SolverError> {
    solve_sized(&PsoSolver::repulsive(), setup, progress)
}

fn metade(setup: &SolverSetup, progress: &SolverProgress) -> Result<SolveOutcome, SolverError> {
    solve_sized(&MetaDeSolver::default(), setup, progress)
}

fn pathfinder_spherical(setup: &SolverSetup, progress: &SolverProgress) -> Result<SolveOutcome, SolverError> {
    solve_sized(&PathfinderSolver::spherical(), setup, progress)
}

fn pathfinder_spiral(setup: &SolverSetup, progress: &SolverProgress) -> Result<SolveOutcome, SolverError> {
    solve_sized(&PathfinderSolver::spiral(), setup, progress)
}

fn sequential_convex(setup: &SolverSetup, progress: &SolverProgress) -> Result<SolveOutcome, SolverError> {
    solve_sized(&ConvexScanSolver::default(), setup, progress)
}

fn sequential_brute_force(setup: &SolverSetup, progress: &SolverProgress) -> Result<SolveOutcome, SolverError> {
    solve_sized(&BruteForceSolver::default(), setup, progress)
}

pub(crate) static SOLVERS: [SolverDescriptor; 7] = [
    SolverDescriptor {
        id: PSO,
        name: "pso",
        description: "Particle swarm optimization",
        solve: pso,
    },
    SolverDescriptor {
        id: REPULSIVE_PSO,
        name: "repulsive-pso",
        description: "Particle swarm with repulsors on found optima, consolidated by a final attracting pass",
        solve: repulsive_pso,
    },
    SolverDescriptor {
        id: METADE,
        name: "metade",
        description: "Differential evolution with self-adapting CR, F and mutation strategy",
        solve: metade,
    },
    SolverDescriptor {
        id: PATHFINDER_SPHERICAL,
        name: "pathfinder-spherical",
        description: "Deterministic sampling on concentric spheres with quadratic refinement",
        solve: pathfinder_spherical,
    },
    SolverDescriptor {
        id: PATHFINDER_SPIRAL,
        name: "pathfinder-spiral",
        description: "Deterministic sampling along a golden-angle spiral with quadratic refinement",
        solve: pathfinder_spiral,
    },
    SolverDescriptor {
        id: SEQUENTIAL_CONVEX,
        name: "sequential-convex",
        description: "Per-dimension ternary search over seeded regions",
        solve: sequential_convex,
    },
    SolverDescriptor {
        id: SEQUENTIAL_BRUTE_FORCE,
        name: "sequential-brute-force",
        description: "Per-dimension grid scan over seeded regions",
        solve: sequential_brute_force,
    },
];
