//! Seeded regions and the driver that steps them in parallel.

use super::config::ScanConfig;
use crate::error::Status;
use crate::fitness::Fitness;
use crate::solver::evaluate::{best_index, Evaluator, Incumbent};
use crate::solver::{Bounds, Point, SolveOutcome, SolverProgress, SolverSetup};
use rayon::prelude::*;

/// One independently scanned sub-box.
#[derive(Debug, Clone)]
pub(crate) struct Region<V: Point> {
    /// Best evaluated point of the region.
    pub position: V,
    pub fitness: Fitness,
    /// Per-dimension `(low, high)` interval still being searched.
    pub bracket: Vec<(f64, f64)>,
    /// Cleared once the scan reports convergence.
    pub active: bool,
}

/// Builds the starting regions: the whole box around the midpoint when no
/// hints are given, otherwise one sub-box per clamped hint.
pub(crate) fn seed_regions<V: Point>(setup: &SolverSetup, config: &ScanConfig) -> Vec<(V, Vec<(f64, f64)>)> {
    let bounds = &setup.bounds;
    let hints: Vec<V> = setup.clamped_hints();
    if hints.is_empty() {
        let full = (0..setup.dim()).map(|i| (bounds.lower()[i], bounds.upper()[i])).collect();
        return vec![(setup.midpoint(), full)];
    }
    hints
        .into_iter()
        .map(|hint| {
            let bracket = sub_box(bounds, hint.as_ref(), config.region_fraction);
            (hint, bracket)
        })
        .collect()
}

fn sub_box(bounds: &Bounds, center: &[f64], fraction: f64) -> Vec<(f64, f64)> {
    center
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let half = fraction * bounds.range(i);
            (bounds.clamp_value(i, c - half), bounds.clamp_value(i, c + half))
        })
        .collect()
}

/// Runs `step` on every active region once per generation and merges the
/// regions' bests through the comparator.
///
/// `step` returns `false` when its region has converged; the scan ends when
/// no region is active, the budget is spent or the caller cancels.
pub(crate) fn scan_regions<V, F>(
    name: &str,
    setup: &SolverSetup,
    progress: &SolverProgress,
    config: &ScanConfig,
    generations: usize,
    step: F,
) -> SolveOutcome
where
    V: Point,
    F: Fn(&mut Region<V>, &Evaluator<'_>) -> bool + Sync,
{
    progress.begin(generations);
    let evaluator = Evaluator::new(setup);

    let seeds = seed_regions::<V>(setup, config);
    let positions: Vec<V> = seeds.iter().map(|(p, _)| p.clone()).collect();
    let fitness = evaluator.evaluate(&positions);
    let mut incumbent = Incumbent::from_population(setup, &positions, &fitness);
    incumbent.record(0, progress);

    let mut regions: Vec<Region<V>> = seeds
        .into_iter()
        .zip(fitness)
        .map(|((position, bracket), fitness)| Region {
            position,
            fitness,
            bracket,
            active: true,
        })
        .collect();
    tracing::debug!(regions = regions.len(), "scan regions seeded");

    let mut generation = 0;
    let mut cancelled = false;
    for _ in 0..generations {
        if progress.is_cancelled() {
            cancelled = true;
            break;
        }

        let advance = |region: &mut Region<V>| {
            if region.active {
                region.active = step(region, &evaluator);
            }
        };
        if setup.parallel {
            regions.par_iter_mut().for_each(advance);
        } else {
            regions.iter_mut().for_each(advance);
        }

        let current: Vec<Fitness> = regions.iter().map(|r| r.fitness).collect();
        let best = best_index(setup, &current);
        incumbent.offer(setup, &regions[best].position, &current[best]);
        generation += 1;
        incumbent.record(generation, progress);

        if regions.iter().all(|r| !r.active) {
            tracing::debug!(generation, "all regions converged");
            break;
        }
    }

    let status = if cancelled { Status::Aborted } else { Status::Ok };
    let archive: Vec<(V, Fitness)> = regions.into_iter().map(|r| (r.position, r.fitness)).collect();
    let evaluations = evaluator.evaluations();
    let outcome = incumbent.into_outcome(setup, status, generation, evaluations, &archive);
    tracing::info!(
        solver = name,
        generations = outcome.generations,
        evaluations,
        best = outcome.best_metric(),
        %status,
        "solve finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::FnObjective;

    #[test]
    fn test_midpoint_region_without_hints() {
        let setup = SolverSetup::new(vec![0.0, 2.0], vec![4.0, 2.0], FnObjective::new(|_: &[f64]| 0.0)).unwrap();
        let regions = seed_regions::<[f64; 2]>(&setup, &ScanConfig::default());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].0, [2.0, 2.0]);
        assert_eq!(regions[0].1, vec![(0.0, 4.0), (2.0, 2.0)]);
    }

    #[test]
    fn test_one_sub_box_per_hint() {
        let setup = SolverSetup::new(vec![0.0], vec![4.0], FnObjective::new(|_: &[f64]| 0.0))
            .unwrap()
            .with_hints(vec![vec![0.5], vec![3.0], vec![9.0]]);
        let regions = seed_regions::<Vec<f64>>(&setup, &ScanConfig::default());
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].1, vec![(0.0, 1.5)]);
        assert_eq!(regions[1].1, vec![(2.0, 4.0)]);
        assert_eq!(regions[2].0, vec![4.0]);
        assert_eq!(regions[2].1, vec![(3.0, 4.0)]);
    }
}
