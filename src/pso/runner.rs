//! PSO execution loop.
//!
//! Each generation runs in two phases. In the parallel phase every particle
//! reads the previous generation's swarm best and writes only its own
//! velocity, position and personal best. The synchronization phase then
//! recomputes the swarm best and publishes progress.

use super::config::{PsoConfig, RepulsiveConfig, DEFAULT_GENERATIONS, DEFAULT_SWARM_SIZE};
use super::types::{Particle, Repulsor};
use crate::error::{SolverError, Status};
use crate::fitness::Fitness;
use crate::solver::evaluate::{best_index, for_each_seeded, Evaluator, Incumbent};
use crate::solver::point::distance;
use crate::solver::{Bounds, Point, SolveOutcome, Solver, SolverProgress, SolverSetup};
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

/// Particle Swarm Optimization, optionally in repulsive multi-modal mode.
///
/// # Examples
///
/// ```
/// use u_fitsolve::pso::PsoSolver;
/// use u_fitsolve::solver::{FnObjective, Solver, SolverProgress, SolverSetup};
///
/// let setup = SolverSetup::new(
///     vec![-5.0, -5.0],
///     vec![5.0, 5.0],
///     FnObjective::new(|x: &[f64]| x.iter().map(|v| v * v).sum()),
/// )
/// .unwrap()
/// .with_population_size(30)
/// .with_max_generations(100)
/// .with_seed(42);
///
/// let outcome = PsoSolver::default()
///     .solve::<[f64; 2]>(&setup, &SolverProgress::new())
///     .unwrap();
/// assert!(outcome.fitness.primary() < 1e-3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PsoSolver {
    pub config: PsoConfig,
}

impl PsoSolver {
    pub fn new(config: PsoConfig) -> Self {
        Self { config }
    }

    /// A solver running the repulsive mode with default settings.
    pub fn repulsive() -> Self {
        Self::new(PsoConfig::default().with_repulsive(RepulsiveConfig::default()))
    }
}

impl Solver for PsoSolver {
    fn name(&self) -> &str {
        if self.config.repulsive.is_some() {
            "repulsive-pso"
        } else {
            "pso"
        }
    }

    fn solve<V: Point>(
        &self,
        setup: &SolverSetup,
        progress: &SolverProgress,
    ) -> Result<SolveOutcome, SolverError> {
        setup.validate_for::<V>()?;
        self.config.validate().map_err(SolverError::InvalidConfig)?;

        let swarm_size = setup.population_or(DEFAULT_SWARM_SIZE);
        let generations = setup.generations_or(DEFAULT_GENERATIONS);
        let _span = tracing::debug_span!(
            "pso",
            dim = setup.dim(),
            swarm = swarm_size,
            generations,
            repulsive = self.config.repulsive.is_some()
        )
        .entered();
        progress.begin(generations);

        let mut run = SwarmRun {
            config: &self.config,
            setup,
            progress,
            evaluator: Evaluator::new(setup),
            rng: setup.rng(),
            swarm_size,
            incumbent: None,
            generation: 0,
            cancelled: false,
        };

        let particles = match &self.config.repulsive {
            None => run.pass(setup.clamped_hints(), generations, &[], &[], true),
            Some(rep) => run.repulsive(rep, generations),
        };

        let status = if run.cancelled { Status::Aborted } else { Status::Ok };
        let archive: Vec<(V, Fitness)> = particles
            .into_iter()
            .map(|p| (p.best_position, p.best_fitness))
            .collect();
        let evaluations = run.evaluator.evaluations();
        let generation = run.generation;
        let incumbent = run
            .incumbent
            .ok_or_else(|| SolverError::Internal("swarm was never evaluated".into()))?;
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

struct SwarmRun<'a, V: Point> {
    config: &'a PsoConfig,
    setup: &'a SolverSetup,
    progress: &'a SolverProgress,
    evaluator: Evaluator<'a>,
    rng: StdRng,
    swarm_size: usize,
    /// Set from the first evaluated swarm.
    incumbent: Option<Incumbent<V>>,
    generation: usize,
    cancelled: bool,
}

impl<V: Point> SwarmRun<'_, V> {
    /// Repulsive mode: sub-searches that push away from earlier optima,
    /// then a final pass pulled toward all of them.
    fn repulsive(&mut self, rep: &RepulsiveConfig, generations: usize) -> Vec<Particle<V>> {
        let setup = self.setup;
        let bounds = &setup.bounds;
        let per_round = generations / (rep.restarts + 1);
        let mut repulsors: Vec<Repulsor> = Vec::new();
        let mut archive: Vec<V> = Vec::new();
        let mut last = Vec::new();

        for round in 0..rep.restarts {
            if self.cancelled {
                break;
            }
            let seeds = if round == 0 {
                setup.clamped_hints()
            } else {
                Vec::new()
            };
            last = self.pass(seeds, per_round, &repulsors, &[], round == 0);

            let best_fitness: Vec<Fitness> = last.iter().map(|p| p.best_fitness).collect();
            let best = &last[best_index(setup, &best_fitness)];
            tracing::debug!(round, best = best.best_fitness.primary(), "sub-search finished");

            // the archive only changes between passes
            for r in &mut repulsors {
                r.remaining = r.remaining.saturating_sub(1);
            }
            repulsors.retain(|r| r.remaining > 0);
            if best.best_fitness.is_valid() {
                repulsors.push(Repulsor {
                    center: to_unit(bounds, best.best_position.as_ref()),
                    remaining: rep.repulsor_lifetime,
                });
                archive.push(best.best_position.clone());
            }
        }

        if self.cancelled {
            return last;
        }
        let attractors: Vec<Vec<f64>> = archive.iter().map(|p| to_unit(bounds, p.as_ref())).collect();
        let remaining = generations - per_round * rep.restarts;
        self.pass(archive, remaining, &[], &attractors, false)
    }

    /// One swarm search of `generations` generations.
    ///
    /// Up to half of the swarm is seeded from `seeds`; the generator places
    /// the rest. Cancellation is checked before every generation, after the
    /// initial evaluation, so the incumbent is always an evaluated point.
    fn pass(
        &mut self,
        seeds: Vec<V>,
        generations: usize,
        repulsors: &[Repulsor],
        attractors: &[Vec<f64>],
        record_initial: bool,
    ) -> Vec<Particle<V>> {
        let setup = self.setup;
        let bounds = &setup.bounds;
        let config = self.config;
        let n = self.swarm_size;

        let mut positions: Vec<V> = seeds.into_iter().take(n.div_ceil(2)).collect();
        let placed = config
            .generator
            .generate::<V, _>(bounds, n - positions.len(), &mut self.rng);
        positions.extend(placed);

        let mut particles: Vec<Particle<V>> = positions
            .into_iter()
            .map(|x| {
                let mut v = V::filled(setup.dim(), 0.0);
                for (i, vi) in v.as_mut().iter_mut().enumerate() {
                    let vmax = config.max_velocity_fraction * bounds.range(i);
                    *vi = (self.rng.random::<f64>() * 2.0 - 1.0) * vmax;
                }
                Particle::new(x, v, setup.objectives_count)
            })
            .collect();

        self.evaluate(&mut particles);
        let mut guide = self.swarm_best(&particles);
        let (generation, progress) = (self.generation, self.progress);
        let incumbent = self.adopt(&guide.0, &guide.1);
        if record_initial {
            incumbent.record(generation, progress);
        }

        let repulsion = config.repulsive.as_ref().filter(|_| !repulsors.is_empty());
        let attraction = config
            .repulsive
            .as_ref()
            .map(|r| r.attraction)
            .filter(|_| !attractors.is_empty());

        for _ in 0..generations {
            if self.progress.is_cancelled() {
                self.cancelled = true;
                break;
            }

            let best = &guide.0;
            for_each_seeded(setup.parallel, &mut particles, &mut self.rng, |_, p, rng| {
                let push = repulsion.map(|rep| repulsion_push(bounds, p.position.as_ref(), repulsors, rep));
                let pull = attraction.and_then(|a| nearest(bounds, p.position.as_ref(), attractors).map(|t| (t, a)));
                step(p, best, config, bounds, rng, push.as_ref(), pull);
            });

            self.evaluate(&mut particles);
            guide = self.swarm_best(&particles);
            self.generation += 1;
            let (generation, progress) = (self.generation, self.progress);
            let incumbent = self.adopt(&guide.0, &guide.1);
            incumbent.record(generation, progress);
            tracing::trace!(generation, best = incumbent.fitness.primary(), "pso generation");
        }

        particles
    }

    /// Offers an evaluated swarm best to the incumbent, creating it on the
    /// first call.
    fn adopt(&mut self, position: &V, fitness: &Fitness) -> &mut Incumbent<V> {
        let setup = self.setup;
        let incumbent = self
            .incumbent
            .get_or_insert_with(|| Incumbent::new(position.clone(), *fitness));
        incumbent.offer(setup, position, fitness);
        incumbent
    }

    /// Evaluates current positions and updates personal bests.
    fn evaluate(&self, particles: &mut [Particle<V>]) {
        let positions: Vec<V> = particles.iter().map(|p| p.position.clone()).collect();
        let fitness = self.evaluator.evaluate(&positions);
        let setup = self.setup;
        let update = |(p, f): (&mut Particle<V>, &Fitness)| {
            p.fitness = *f;
            if setup.is_better(f, &p.best_fitness) {
                p.best_position = p.position.clone();
                p.best_fitness = *f;
            }
        };
        if setup.parallel {
            particles.par_iter_mut().zip(fitness.par_iter()).for_each(update);
        } else {
            particles.iter_mut().zip(fitness.iter()).for_each(update);
        }
    }

    /// Swarm best over personal bests.
    fn swarm_best(&self, particles: &[Particle<V>]) -> (V, Fitness) {
        let fitness: Vec<Fitness> = particles.iter().map(|p| p.best_fitness).collect();
        let i = best_index(self.setup, &fitness);
        (particles[i].best_position.clone(), fitness[i])
    }
}

/// Velocity and position update of one particle.
fn step<V: Point>(
    p: &mut Particle<V>,
    swarm_best: &V,
    config: &PsoConfig,
    bounds: &Bounds,
    rng: &mut StdRng,
    push: Option<&Vec<f64>>,
    pull: Option<(&[f64], f64)>,
) {
    let dim = bounds.dim();
    let mut r1 = V::filled(dim, 0.0);
    let mut r2 = V::filled(dim, 0.0);
    config.velocity_modifier.draw(rng, r1.as_mut(), r2.as_mut());
    let r3: f64 = rng.random();

    let x = p.position.as_mut();
    let v = p.velocity.as_mut();
    let pb = p.best_position.as_ref();
    let gb = swarm_best.as_ref();
    let (r1, r2) = (r1.as_ref(), r2.as_ref());

    for i in 0..dim {
        if bounds.is_fixed(i) {
            v[i] = 0.0;
            x[i] = bounds.lower()[i];
            continue;
        }
        let range = bounds.range(i);
        let vmax = config.max_velocity_fraction * range;
        let mut vi = config.inertia * v[i]
            + config.cognitive * r1[i] * (pb[i] - x[i])
            + config.social * r2[i] * (gb[i] - x[i]);
        if let Some(push) = push {
            vi += push[i] * range;
        }
        if let Some((target, a)) = pull {
            vi += a * r3 * (bounds.from_unit(i, target[i]) - x[i]);
        }
        vi = if vi.is_finite() { vi.clamp(-vmax, vmax) } else { 0.0 };

        let moved = x[i] + vi;
        x[i] = bounds.clamp_value(i, moved);
        v[i] = if x[i] == moved { vi } else { 0.0 };
    }
}

/// Unit-cube displacement away from every repulsor within its radius.
fn repulsion_push(bounds: &Bounds, x: &[f64], repulsors: &[Repulsor], rep: &RepulsiveConfig) -> Vec<f64> {
    let u = to_unit(bounds, x);
    let mut push = vec![0.0; u.len()];
    for r in repulsors {
        let d = distance(&u, &r.center);
        if d > 0.0 && d < rep.radius {
            let factor = rep.strength * (1.0 - d / rep.radius) / d;
            for ((p, ui), ci) in push.iter_mut().zip(&u).zip(&r.center) {
                *p += factor * (ui - ci);
            }
        }
    }
    push
}

/// The attractor closest to `x`, in unit-cube coordinates.
fn nearest<'t>(bounds: &Bounds, x: &[f64], attractors: &'t [Vec<f64>]) -> Option<&'t [f64]> {
    let u = to_unit(bounds, x);
    attractors
        .iter()
        .map(|a| (distance(&u, a), a))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, a)| a.as_slice())
}

fn to_unit(bounds: &Bounds, x: &[f64]) -> Vec<f64> {
    x.iter().enumerate().map(|(i, &v)| bounds.to_unit(i, v)).collect()
}
