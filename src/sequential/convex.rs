//! Convex (ternary) coordinate scan.

use super::config::{ScanConfig, DEFAULT_CONVEX_ITERATIONS};
use super::region::{scan_regions, Region};
use crate::error::SolverError;
use crate::solver::evaluate::{best_index, Evaluator};
use crate::solver::{Point, SolveOutcome, Solver, SolverProgress, SolverSetup};

/// Coordinate-wise ternary search, assuming each dimension is unimodal.
///
/// Every iteration probes the one-third and two-thirds points of each open
/// bracket (all dimensions in one batch), keeps the better side, then tries
/// the point combining every dimension's winning probe.
///
/// # Examples
///
/// ```
/// use u_fitsolve::sequential::ConvexScanSolver;
/// use u_fitsolve::solver::{FnObjective, Solver, SolverProgress, SolverSetup};
///
/// let setup = SolverSetup::new(
///     vec![0.0, 0.0],
///     vec![4.0, 4.0],
///     FnObjective::new(|x: &[f64]| (x[0] - 1.0).powi(2) + (x[1] - 3.0).abs()),
/// )
/// .unwrap()
/// .with_max_generations(60);
///
/// let outcome = ConvexScanSolver::default()
///     .solve::<[f64; 2]>(&setup, &SolverProgress::new())
///     .unwrap();
/// assert!(outcome.best_metric() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConvexScanSolver {
    pub config: ScanConfig,
}

impl ConvexScanSolver {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }
}

impl Solver for ConvexScanSolver {
    fn name(&self) -> &str {
        "sequential-convex"
    }

    fn solve<V: Point>(
        &self,
        setup: &SolverSetup,
        progress: &SolverProgress,
    ) -> Result<SolveOutcome, SolverError> {
        setup.validate_for::<V>()?;
        self.config.validate().map_err(SolverError::InvalidConfig)?;

        let iterations = setup.generations_or(DEFAULT_CONVEX_ITERATIONS);
        let _span = tracing::debug_span!("convex_scan", dim = setup.dim(), iterations).entered();

        let tolerance = self.config.tolerance;
        Ok(scan_regions(
            self.name(),
            setup,
            progress,
            &self.config,
            iterations,
            |region: &mut Region<V>, evaluator: &Evaluator<'_>| ternary_step(setup, tolerance, region, evaluator),
        ))
    }
}

/// One ternary iteration over every open dimension of `region`.
///
/// Returns `false` once every bracket is closed.
fn ternary_step<V: Point>(
    setup: &SolverSetup,
    tolerance: f64,
    region: &mut Region<V>,
    evaluator: &Evaluator<'_>,
) -> bool {
    let bounds = &setup.bounds;
    let open: Vec<usize> = (0..setup.dim())
        .filter(|&i| {
            let (low, high) = region.bracket[i];
            high - low > tolerance * bounds.range(i)
        })
        .collect();
    if open.is_empty() {
        return false;
    }

    let mut thirds = Vec::with_capacity(open.len());
    let mut probes: Vec<V> = Vec::with_capacity(2 * open.len() + 1);
    for &i in &open {
        let (low, high) = region.bracket[i];
        let width = high - low;
        let (m1, m2) = (low + width / 3.0, high - width / 3.0);
        thirds.push((m1, m2));
        for m in [m1, m2] {
            let mut p = region.position.clone();
            p.as_mut()[i] = m;
            probes.push(p);
        }
    }
    let mut fitness = evaluator.evaluate(&probes);

    let mut combined = region.position.clone();
    for (k, (&i, &(m1, m2))) in open.iter().zip(&thirds).enumerate() {
        let (low, high) = region.bracket[i];
        let (f1, f2) = (&fitness[2 * k], &fitness[2 * k + 1]);
        let x = combined.as_mut();
        if setup.is_better(f1, f2) {
            region.bracket[i] = (low, m2);
            x[i] = m1;
        } else if setup.is_better(f2, f1) {
            region.bracket[i] = (m1, high);
            x[i] = m2;
        } else {
            // Tied (or both failed): the minimum lies between the probes.
            region.bracket[i] = (m1, m2);
            x[i] = 0.5 * (m1 + m2);
        }
    }
    fitness.push(evaluator.evaluate_one(&combined));
    probes.push(combined);

    let best = best_index(setup, &fitness);
    if setup.is_better(&fitness[best], &region.fitness) {
        region.position = probes.swap_remove(best);
        region.fitness = fitness[best];
    }
    true
}
