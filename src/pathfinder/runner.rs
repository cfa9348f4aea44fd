//! Pathfinder generation loop and local refinement.

use super::config::{PathfinderConfig, DEFAULT_GENERATIONS, DEFAULT_SAMPLES};
use super::types::{quadratic_vertex, Estimate, PathfinderVariant};
use crate::error::{SolverError, Status};
use crate::fitness::Fitness;
use crate::halton::HaltonPoints;
use crate::solver::evaluate::{Evaluator, Incumbent};
use crate::solver::{Bounds, Point, SolveOutcome, Solver, SolverProgress, SolverSetup};
use rand::Rng;
use rayon::prelude::*;

/// Spherical or spiral pathfinder sampler.
///
/// # Examples
///
/// ```
/// use u_fitsolve::pathfinder::PathfinderSolver;
/// use u_fitsolve::solver::{FnObjective, Solver, SolverProgress, SolverSetup};
///
/// let setup = SolverSetup::new(
///     vec![-1.0, -1.0],
///     vec![1.0, 1.0],
///     FnObjective::new(|x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] + 0.2).powi(2)),
/// )
/// .unwrap()
/// .with_max_generations(30);
///
/// let outcome = PathfinderSolver::spiral()
///     .solve::<[f64; 2]>(&setup, &SolverProgress::new())
///     .unwrap();
/// assert!(outcome.best_metric() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathfinderSolver {
    pub config: PathfinderConfig,
}

impl PathfinderSolver {
    pub fn new(config: PathfinderConfig) -> Self {
        Self { config }
    }

    pub fn spherical() -> Self {
        Self::new(PathfinderConfig::default().with_variant(PathfinderVariant::Spherical))
    }

    pub fn spiral() -> Self {
        Self::new(PathfinderConfig::default().with_variant(PathfinderVariant::Spiral))
    }
}

impl Solver for PathfinderSolver {
    fn name(&self) -> &str {
        match self.config.variant {
            PathfinderVariant::Spherical => "pathfinder-spherical",
            PathfinderVariant::Spiral => "pathfinder-spiral",
        }
    }

    fn solve<V: Point>(
        &self,
        setup: &SolverSetup,
        progress: &SolverProgress,
    ) -> Result<SolveOutcome, SolverError> {
        setup.validate_for::<V>()?;
        self.config.validate().map_err(SolverError::InvalidConfig)?;

        let samples = setup.population_or(DEFAULT_SAMPLES);
        let generations = setup.generations_or(DEFAULT_GENERATIONS);
        let dim = setup.dim();
        let _span = tracing::debug_span!("pathfinder", variant = self.name(), dim, samples, generations).entered();
        progress.begin(generations);

        let bounds = &setup.bounds;
        let evaluator = Evaluator::new(setup);
        let mut rng = setup.rng();
        let mut halton = HaltonPoints::leading(dim, rng.random_range(0..1024));

        // The first center is the best of the hints and the box midpoint.
        let mut starts: Vec<V> = setup.clamped_hints();
        starts.push(setup.midpoint());
        let start_fitness = evaluator.evaluate(&starts);
        let mut incumbent = Incumbent::from_population(setup, &starts, &start_fitness);
        incumbent.record(0, progress);
        let mut archive: Vec<(V, Fitness)> = starts.into_iter().zip(start_fitness).collect();

        let mut radius = self.config.initial_radius;
        let mut offset = vec![0.0; dim];
        let mut generation = 0;
        let mut cancelled = false;

        for _ in 0..generations {
            if progress.is_cancelled() {
                cancelled = true;
                break;
            }

            // 1. Sample around the center
            let center = incumbent.position.clone();
            let points: Vec<V> = (0..samples)
                .map(|k| {
                    self.config
                        .variant
                        .offset(k, samples, radius, &mut halton, &mut offset);
                    let mut p = center.clone();
                    for (i, (x, o)) in p.as_mut().iter_mut().zip(&offset).enumerate() {
                        let u = (bounds.to_unit(i, *x) + o).clamp(0.0, 1.0);
                        *x = bounds.from_unit(i, u);
                    }
                    p
                })
                .collect();
            let fitness = evaluator.evaluate(&points);
            let collapsed = is_collapsed(&points);

            // 2. Refine around the best known point
            let improved_by_samples = incumbent.offer_population(setup, &points, &fitness);
            let probes = refine(
                setup,
                &points,
                &fitness,
                &incumbent.position,
                &incumbent.fitness,
                radius,
            );
            let probe_fitness = evaluator.evaluate(&probes);
            let improved_by_probes = incumbent.offer_population(setup, &probes, &probe_fitness);

            // 3. Adapt the cloud
            radius = if improved_by_samples || improved_by_probes {
                (radius * self.config.grow).min(1.0)
            } else {
                radius * self.config.shrink
            };

            generation += 1;
            incumbent.record(generation, progress);
            tracing::trace!(generation, radius, best = incumbent.fitness.primary(), "pathfinder generation");

            archive = points
                .into_iter()
                .zip(fitness)
                .chain(probes.into_iter().zip(probe_fitness))
                .collect();

            if collapsed {
                tracing::debug!(generation, "sample cloud collapsed");
                break;
            }
        }

        let status = if cancelled { Status::Aborted } else { Status::Ok };
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

/// Returns `true` when best and worst coincide along every dimension, i.e.
/// all samples are the same point.
fn is_collapsed<V: Point>(points: &[V]) -> bool {
    let Some(first) = points.first() else {
        return true;
    };
    points.iter().all(|p| p.as_ref() == first.as_ref())
}

/// Builds refinement probes around `best`.
///
/// Per dimension, a parabola is fitted through `best` and its nearest
/// evaluated neighbors below and above along that dimension. A convex fit
/// yields a probe at its vertex; otherwise two probes are placed at twice
/// the neighbor spacing on either side. When more than one dimension yields
/// a vertex, a combined probe moves all of them at once.
fn refine<V: Point>(
    setup: &SolverSetup,
    points: &[V],
    fitness: &[Fitness],
    best: &V,
    best_fitness: &Fitness,
    radius: f64,
) -> Vec<V> {
    if !best_fitness.is_valid() {
        return Vec::new();
    }
    let bounds = &setup.bounds;
    let b = best.as_ref();
    let fb = best_fitness.norm();

    let estimate = |i: usize| estimate_dimension(bounds, i, points, fitness, b, fb, radius);
    let estimates: Vec<Estimate> = if setup.parallel {
        (0..setup.dim()).into_par_iter().map(estimate).collect()
    } else {
        (0..setup.dim()).map(estimate).collect()
    };

    let mut probes = Vec::new();
    let mut combined = best.clone();
    let mut vertices = 0;
    for (i, estimate) in estimates.into_iter().enumerate() {
        match estimate {
            Estimate::Skip => {}
            Estimate::Vertex(x) => {
                let mut p = best.clone();
                p.as_mut()[i] = x;
                probes.push(p);
                combined.as_mut()[i] = x;
                vertices += 1;
            }
            Estimate::Expand(lo, hi) => {
                for x in [lo, hi] {
                    if x != b[i] {
                        let mut p = best.clone();
                        p.as_mut()[i] = x;
                        probes.push(p);
                    }
                }
            }
        }
    }
    if vertices > 1 {
        probes.push(combined);
    }
    probes
}

fn estimate_dimension<V: Point>(
    bounds: &Bounds,
    i: usize,
    points: &[V],
    fitness: &[Fitness],
    b: &[f64],
    fb: f64,
    radius: f64,
) -> Estimate {
    if bounds.is_fixed(i) {
        return Estimate::Skip;
    }
    let bi = b[i];
    let mut lower: Option<(f64, f64)> = None;
    let mut upper: Option<(f64, f64)> = None;
    for (p, f) in points.iter().zip(fitness) {
        if !f.is_valid() {
            continue;
        }
        let x = p.as_ref()[i];
        if x < bi && lower.is_none_or(|(lx, _)| x > lx) {
            lower = Some((x, f.norm()));
        } else if x > bi && upper.is_none_or(|(ux, _)| x < ux) {
            upper = Some((x, f.norm()));
        }
    }

    if let (Some((xl, fl)), Some((xu, fu))) = (lower, upper) {
        if let Some(v) = quadratic_vertex(xl, fl, bi, fb, xu, fu) {
            return Estimate::Vertex(bounds.clamp_value(i, v.clamp(xl, xu)));
        }
    }

    let spacing = match (lower, upper) {
        (Some((xl, _)), Some((xu, _))) => (bi - xl).max(xu - bi),
        (Some((xl, _)), None) => bi - xl,
        (None, Some((xu, _))) => xu - bi,
        (None, None) => radius * bounds.range(i),
    };
    if !spacing.is_finite() || spacing <= 0.0 {
        return Estimate::Skip;
    }
    Estimate::Expand(
        bounds.clamp_value(i, bi - 2.0 * spacing),
        bounds.clamp_value(i, bi + 2.0 * spacing),
    )
}
