//! MetaDE generation loop.

use super::config::{MetaDeConfig, DEFAULT_GENERATIONS, DEFAULT_POPULATION, MIN_POPULATION};
use super::types::{distinct_indices, top_k, Individual, MutationStrategy};
use crate::error::{SolverError, Status};
use crate::fitness::Fitness;
use crate::solver::evaluate::{best_index, for_each_seeded, Evaluator, Incumbent};
use crate::solver::{Bounds, Point, SolveOutcome, Solver, SolverProgress, SolverSetup};
use rand::Rng;

/// Self-adaptive differential evolution.
///
/// # Examples
///
/// ```
/// use u_fitsolve::metade::MetaDeSolver;
/// use u_fitsolve::solver::{FnObjective, Solver, SolverProgress, SolverSetup};
///
/// let setup = SolverSetup::new(
///     vec![-2.0; 3],
///     vec![2.0; 3],
///     FnObjective::new(|x: &[f64]| x.iter().map(|v| (v - 1.0).powi(2)).sum()),
/// )
/// .unwrap()
/// .with_population_size(30)
/// .with_max_generations(200)
/// .with_seed(1);
///
/// let outcome = MetaDeSolver::default()
///     .solve::<Vec<f64>>(&setup, &SolverProgress::new())
///     .unwrap();
/// assert!(outcome.best_metric() < 1e-3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetaDeSolver {
    pub config: MetaDeConfig,
}

impl MetaDeSolver {
    pub fn new(config: MetaDeConfig) -> Self {
        Self { config }
    }

    /// Redraws crossover rate, scale factor and strategy.
    fn draw_parameters<V: Point, R: Rng>(&self, individual: &mut Individual<V>, rng: &mut R) {
        let (cr_lo, cr_hi) = self.config.cr_range;
        let (f_lo, f_hi) = self.config.f_range;
        individual.cr = cr_lo + rng.random::<f64>() * (cr_hi - cr_lo);
        individual.f = f_lo + rng.random::<f64>() * (f_hi - f_lo);
        individual.strategy = self.config.strategies[rng.random_range(0..self.config.strategies.len())];
    }
}

impl Solver for MetaDeSolver {
    fn name(&self) -> &str {
        "metade"
    }

    fn solve<V: Point>(
        &self,
        setup: &SolverSetup,
        progress: &SolverProgress,
    ) -> Result<SolveOutcome, SolverError> {
        setup.validate_for::<V>()?;
        self.config.validate().map_err(SolverError::InvalidConfig)?;

        let size = setup.population_or(DEFAULT_POPULATION).max(MIN_POPULATION);
        let generations = setup.generations_or(DEFAULT_GENERATIONS);
        let top_count = ((self.config.p_best_fraction * size as f64).ceil() as usize).clamp(2, size);
        let _span = tracing::debug_span!(
            "metade",
            dim = setup.dim(),
            population = size,
            generations,
            top_count
        )
        .entered();
        progress.begin(generations);

        let bounds = &setup.bounds;
        let evaluator = Evaluator::new(setup);
        let mut rng = setup.rng();

        // 1. Initial population: hints, then Halton points
        let positions: Vec<V> = setup.initial_population(size, &mut rng);
        let fitness = evaluator.evaluate(&positions);
        let mut incumbent = Incumbent::from_population(setup, &positions, &fitness);
        incumbent.record(0, progress);

        let mut trials = positions.clone();
        let mut population: Vec<Individual<V>> = positions
            .into_iter()
            .zip(fitness)
            .map(|(position, fitness)| {
                let mut ind = Individual {
                    position,
                    fitness,
                    cr: 0.0,
                    f: 0.0,
                    strategy: MutationStrategy::CurrentToPBest,
                };
                self.draw_parameters(&mut ind, &mut rng);
                ind
            })
            .collect();

        let mut generation = 0;
        let mut cancelled = false;

        // 2. Generation loop
        for _ in 0..generations {
            if progress.is_cancelled() {
                cancelled = true;
                break;
            }

            let current: Vec<Fitness> = population.iter().map(|ind| ind.fitness).collect();
            let top = top_k(&current, top_count, |a, b| setup.is_better(a, b));

            // Trial vectors are written to a separate buffer; the population
            // stays read-only until every trial has been evaluated.
            let parents = &population;
            for_each_seeded(setup.parallel, &mut trials, &mut rng, |i, trial, rng| {
                build_trial(i, parents, &top, bounds, rng, trial);
            });
            let trial_fitness = evaluator.evaluate(&trials);

            // Greedy replacement
            let trials_ref = &trials;
            for_each_seeded(setup.parallel, &mut population, &mut rng, |i, ind, rng| {
                if setup.is_better(&trial_fitness[i], &ind.fitness) {
                    ind.position = trials_ref[i].clone();
                    ind.fitness = trial_fitness[i];
                } else {
                    self.draw_parameters(ind, rng);
                }
            });

            let current: Vec<Fitness> = population.iter().map(|ind| ind.fitness).collect();
            let best = best_index(setup, &current);
            incumbent.offer(setup, &population[best].position, &current[best]);
            generation += 1;
            incumbent.record(generation, progress);
            tracing::trace!(generation, best = incumbent.fitness.primary(), "metade generation");
        }

        let status = if cancelled { Status::Aborted } else { Status::Ok };
        let archive: Vec<(V, Fitness)> = population
            .into_iter()
            .map(|ind| (ind.position, ind.fitness))
            .collect();
        let evaluations = evaluator.evaluations();
        let outcome = incumbent.into_outcome(setup, status, generation, evaluations, &archive);

        tracing::info!(
            solver = self.name(),
            generations = outcome.generations,
            evaluations,
            best = outcome.best_metric(),
            %status,
            "solve finished"
        );
        Ok(outcome)
    }
}

/// Mutation, clamping and crossover for individual `i`.
///
/// `top` is the top-k set, best first. Crossover keeps at least one
/// coordinate of the parent and, when the problem has two or more
/// dimensions, at least one coordinate of the mutant.
fn build_trial<V: Point, R: Rng>(
    i: usize,
    population: &[Individual<V>],
    top: &[usize],
    bounds: &Bounds,
    rng: &mut R,
    trial: &mut V,
) {
    let parent = &population[i];
    let x = parent.position.as_ref();
    let f = parent.f;
    let r = distinct_indices(i, parent.strategy.random_members(), population.len(), rng);
    let member = |j: usize| population[j].position.as_ref();
    let pbest = top[rng.random_range(0..top.len())];
    let out = trial.as_mut();
    let dim = out.len();

    match parent.strategy {
        MutationStrategy::CurrentToPBest => {
            let (p, a, b) = (member(pbest), member(r[0]), member(r[1]));
            for d in 0..dim {
                out[d] = x[d] + f * (p[d] - x[d]) + f * (a[d] - b[d]);
            }
        }
        MutationStrategy::CurrentToUniformPBest => {
            let (a, b) = (member(r[0]), member(r[1]));
            for d in 0..dim {
                let p = member(top[rng.random_range(0..top.len())]);
                out[d] = x[d] + f * (p[d] - x[d]) + f * (a[d] - b[d]);
            }
        }
        MutationStrategy::Best2Bin => {
            let best = member(top[0]);
            let (a, b, c, e) = (member(r[0]), member(r[1]), member(r[2]), member(r[3]));
            for d in 0..dim {
                out[d] = best[d] + f * (a[d] - b[d]) + f * (c[d] - e[d]);
            }
        }
        MutationStrategy::UniformBest1 => {
            let (p, a, b) = (member(pbest), member(r[0]), member(r[1]));
            for d in 0..dim {
                out[d] = p[d] + f * (a[d] - b[d]);
            }
        }
        MutationStrategy::CurrentToRand1 => {
            let k: f64 = rng.random();
            let (a, b, c) = (member(r[0]), member(r[1]), member(r[2]));
            for d in 0..dim {
                out[d] = x[d] + k * (a[d] - x[d]) + f * (b[d] - c[d]);
            }
        }
    }
    bounds.clamp(out);

    // binomial crossover
    let from_mutant = rng.random_range(0..dim);
    let from_parent = if dim > 1 {
        Some((from_mutant + rng.random_range(1..dim)) % dim)
    } else {
        None
    };
    for d in 0..dim {
        let keep_parent = Some(d) == from_parent
            || (d != from_mutant && rng.random::<f64>() >= parent.cr);
        if keep_parent {
            out[d] = x[d];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::FnObjective;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere_setup(lower: Vec<f64>, upper: Vec<f64>) -> SolverSetup {
        SolverSetup::new(
            lower,
            upper,
            FnObjective::new(|x: &[f64]| x.iter().map(|v| v * v).sum()),
        )
        .unwrap()
        .with_population_size(30)
        .with_max_generations(50)
        .with_seed(5)
    }

    // ================================================================
    // Convergence
    // ================================================================

    #[test]
    fn test_sphere_unit_square() {
        let setup = sphere_setup(vec![0.0, 0.0], vec![1.0, 1.0]);
        let outcome = MetaDeSolver::default()
            .solve::<[f64; 2]>(&setup, &SolverProgress::new())
            .unwrap();
        assert!(outcome.best_metric() < 1e-3, "got {}", outcome.best_metric());
        assert_eq!(outcome.generations, 50);
        assert_eq!(outcome.evaluations, 30 * 51);
    }

    #[test]
    fn test_rosenbrock() {
        let setup = SolverSetup::new(
            vec![-2.0, -2.0],
            vec![2.0, 2.0],
            FnObjective::new(|x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)),
        )
        .unwrap()
        .with_population_size(40)
        .with_max_generations(300)
        .with_seed(17);
        let outcome = MetaDeSolver::default()
            .solve::<[f64; 2]>(&setup, &SolverProgress::new())
            .unwrap();
        assert!(outcome.best_metric() < 1e-2, "got {}", outcome.best_metric());
    }

    #[test]
    fn test_each_strategy_alone_makes_progress() {
        let setup = sphere_setup(vec![-3.0; 3], vec![3.0; 3]).with_max_generations(200);
        for strategy in MutationStrategy::ALL {
            let solver = MetaDeSolver::new(MetaDeConfig::default().with_strategies(vec![strategy]));
            let outcome = solver.solve::<[f64; 3]>(&setup, &SolverProgress::new()).unwrap();
            assert!(outcome.best_metric() < 1e-2, "{strategy:?}: {}", outcome.best_metric());
        }
    }

    // ================================================================
    // Contract
    // ================================================================

    #[test]
    fn test_history_never_worsens() {
        let setup = sphere_setup(vec![-5.0; 6], vec![5.0; 6]);
        let outcome = MetaDeSolver::default()
            .solve::<[f64; 6]>(&setup, &SolverProgress::new())
            .unwrap();
        assert_eq!(outcome.history.len(), 51);
        for w in outcome.history.windows(2) {
            assert!(w[1].primary() <= w[0].primary());
        }
    }

    #[test]
    fn test_fixed_dimension_is_never_moved() {
        let setup = SolverSetup::new(
            vec![-1.0, 3.0],
            vec![1.0, 3.0],
            FnObjective::new(|x: &[f64]| x[0] * x[0] + x[1]),
        )
        .unwrap()
        .with_population_size(10)
        .with_max_generations(20)
        .with_seed(2);
        let outcome = MetaDeSolver::default()
            .solve::<Vec<f64>>(&setup, &SolverProgress::new())
            .unwrap();
        assert_eq!(outcome.solution[1], 3.0);
    }

    #[test]
    fn test_small_population_is_raised() {
        let setup = sphere_setup(vec![-1.0], vec![1.0]).with_population_size(2);
        let outcome = MetaDeSolver::default()
            .solve::<Vec<f64>>(&setup, &SolverProgress::new())
            .unwrap();
        assert_eq!(outcome.evaluations, MIN_POPULATION * 51);
    }

    #[test]
    fn test_cancel_before_start() {
        let setup = sphere_setup(vec![0.0, 0.0], vec![1.0, 1.0]);
        let progress = SolverProgress::new();
        progress.cancel();
        let outcome = MetaDeSolver::default().solve::<[f64; 2]>(&setup, &progress).unwrap();
        assert_eq!(outcome.status, Status::Aborted);
        assert!(outcome.fitness.is_valid());
        assert!(setup.bounds.contains(&outcome.solution));
    }

    #[test]
    fn test_trial_stays_in_bounds_and_keeps_parent_coordinate() {
        let bounds = Bounds::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let population: Vec<Individual<[f64; 4]>> = (0..8)
            .map(|k| Individual {
                position: [k as f64 / 8.0; 4],
                fitness: Fitness::single(k as f64),
                cr: 1.0,
                f: 2.0,
                strategy: MutationStrategy::ALL[k % 5],
            })
            .collect();
        let top = vec![0, 1];
        for i in 0..8 {
            let mut trial = [0.0; 4];
            build_trial(i, &population, &top, &bounds, &mut rng, &mut trial);
            assert!(bounds.contains(&trial));
            // with cr = 1 exactly one coordinate is inherited from the parent
            let inherited = trial
                .iter()
                .filter(|&&v| v == population[i].position[0])
                .count();
            assert!(inherited >= 1);
        }
    }
}
