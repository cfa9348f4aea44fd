//! Brute-force coordinate grid scan.

use super::config::{ScanConfig, DEFAULT_BRUTE_FORCE_PASSES, DEFAULT_BRUTE_FORCE_STEPS};
use super::region::{scan_regions, Region};
use crate::error::SolverError;
use crate::solver::evaluate::{best_index, Evaluator};
use crate::solver::{Point, SolveOutcome, Solver, SolverProgress, SolverSetup};

/// Discretizes each dimension of a region into a fixed number of grid
/// steps and scans them one dimension at a time, holding the best point
/// found so far. Passes repeat until one improves nothing.
///
/// The setup's `population_size` is the number of steps per dimension and
/// `max_generations` caps the number of passes.
///
/// # Examples
///
/// ```
/// use u_fitsolve::sequential::BruteForceSolver;
/// use u_fitsolve::solver::{FnObjective, Solver, SolverProgress, SolverSetup};
///
/// let setup = SolverSetup::new(
///     vec![0.0, 0.0],
///     vec![1.0, 1.0],
///     FnObjective::new(|x: &[f64]| (x[0] - 0.25).abs() + (x[1] - 0.75).abs()),
/// )
/// .unwrap()
/// .with_population_size(5);
///
/// let outcome = BruteForceSolver::default()
///     .solve::<[f64; 2]>(&setup, &SolverProgress::new())
///     .unwrap();
/// assert_eq!(outcome.solution, vec![0.25, 0.75]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BruteForceSolver {
    pub config: ScanConfig,
}

impl BruteForceSolver {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }
}

impl Solver for BruteForceSolver {
    fn name(&self) -> &str {
        "sequential-brute-force"
    }

    fn solve<V: Point>(
        &self,
        setup: &SolverSetup,
        progress: &SolverProgress,
    ) -> Result<SolveOutcome, SolverError> {
        setup.validate_for::<V>()?;
        self.config.validate().map_err(SolverError::InvalidConfig)?;

        let steps = setup.population_or(DEFAULT_BRUTE_FORCE_STEPS).max(2);
        let passes = setup.generations_or(DEFAULT_BRUTE_FORCE_PASSES);
        let _span = tracing::debug_span!("brute_force", dim = setup.dim(), steps, passes).entered();

        Ok(scan_regions(
            self.name(),
            setup,
            progress,
            &self.config,
            passes,
            |region: &mut Region<V>, evaluator: &Evaluator<'_>| grid_pass(setup, steps, region, evaluator),
        ))
    }
}

/// Scans every free dimension of `region` once. Returns `true` if any
/// dimension improved the region's best.
fn grid_pass<V: Point>(
    setup: &SolverSetup,
    steps: usize,
    region: &mut Region<V>,
    evaluator: &Evaluator<'_>,
) -> bool {
    let mut improved = false;
    for i in 0..setup.dim() {
        let (low, high) = region.bracket[i];
        if high <= low {
            continue;
        }
        let mut grid: Vec<V> = (0..steps)
            .map(|k| {
                let mut p = region.position.clone();
                let x = low + (high - low) * k as f64 / (steps - 1) as f64;
                p.as_mut()[i] = setup.bounds.clamp_value(i, x);
                p
            })
            .collect();
        let fitness = evaluator.evaluate(&grid);
        let best = best_index(setup, &fitness);
        if setup.is_better(&fitness[best], &region.fitness) {
            region.position = grid.swap_remove(best);
            region.fitness = fitness[best];
            improved = true;
        }
    }
    improved
}
