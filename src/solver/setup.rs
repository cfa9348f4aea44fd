//! The problem description shared by every solver.

use super::bounds::Bounds;
use super::point::Point;
use crate::error::SolverError;
use crate::fitness::comparator::CustomComparator;
use crate::fitness::{Comparator, Fitness, FitnessComparator, MAX_OBJECTIVES};
use crate::halton::HaltonPoints;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// An opaque, possibly expensive objective.
///
/// The engine hands over candidates in batches. The implementation writes
/// one [`Fitness`] per candidate into `fitness` (pre-filled with failed
/// values of the right objective count) and returns `false` if the whole
/// batch failed; every candidate of a failed batch is then scored `NaN`.
///
/// Batches are evaluated concurrently from rayon workers, hence `Send + Sync`.
pub trait Objective: Send + Sync {
    /// Evaluates `solutions[i]` into `fitness[i]`.
    fn evaluate(&self, solutions: &[&[f64]], fitness: &mut [Fitness]) -> bool;
}

/// Adapts a single-objective closure `Fn(&[f64]) -> f64` to [`Objective`].
///
/// # Examples
///
/// ```
/// use u_fitsolve::solver::{FnObjective, Objective};
/// use u_fitsolve::fitness::Fitness;
///
/// let sphere = FnObjective::new(|x: &[f64]| x.iter().map(|v| v * v).sum());
/// let mut out = [Fitness::failed(1)];
/// assert!(sphere.evaluate(&[&[3.0, 4.0]], &mut out));
/// assert_eq!(out[0].primary(), 25.0);
/// ```
pub struct FnObjective<F>(F);

impl<F> FnObjective<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, solutions: &[&[f64]], fitness: &mut [Fitness]) -> bool {
        for (x, out) in solutions.iter().zip(fitness.iter_mut()) {
            *out = Fitness::single((self.0)(x));
        }
        true
    }
}

/// Adapts a multi-objective closure to [`Objective`].
///
/// The closure fills the objective slice and returns `false` when the model
/// could not be evaluated for that candidate.
pub struct MultiFnObjective<F>(F);

impl<F> MultiFnObjective<F>
where
    F: Fn(&[f64], &mut [f64]) -> bool + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Objective for MultiFnObjective<F>
where
    F: Fn(&[f64], &mut [f64]) -> bool + Send + Sync,
{
    fn evaluate(&self, solutions: &[&[f64]], fitness: &mut [Fitness]) -> bool {
        for (x, out) in solutions.iter().zip(fitness.iter_mut()) {
            let count = out.len();
            if !(self.0)(x, out.as_mut_slice()) {
                *out = Fitness::failed(count);
            }
        }
        true
    }
}

/// Immutable description of one solve.
///
/// `population_size` and `max_generations` of `0` select the solver's own
/// defaults.
///
/// # Examples
///
/// ```
/// use u_fitsolve::solver::{FnObjective, SolverSetup};
///
/// let setup = SolverSetup::new(
///     vec![0.0, 0.0],
///     vec![1.0, 1.0],
///     FnObjective::new(|x: &[f64]| x[0] * x[0] + x[1] * x[1]),
/// )
/// .unwrap()
/// .with_population_size(30)
/// .with_max_generations(50)
/// .with_seed(7);
///
/// assert_eq!(setup.dim(), 2);
/// assert!(setup.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct SolverSetup {
    /// Box constraints.
    pub bounds: Bounds,
    /// Caller-supplied starting candidates; clamped before use.
    pub hints: Vec<Vec<f64>>,
    /// The objective.
    pub objective: Arc<dyn Objective>,
    /// Number of objectives the objective produces.
    pub objectives_count: usize,
    /// Fitness ordering.
    pub comparator: Comparator,
    /// Population size; 0 = solver default.
    pub population_size: usize,
    /// Generation budget; 0 = solver default.
    pub max_generations: usize,
    /// Maximum number of candidates handed to the objective per call.
    pub batch_size: usize,
    /// Whether candidate work is spread over the rayon pool.
    pub parallel: bool,
    /// Random seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl SolverSetup {
    /// Creates a single-objective setup with default sizing.
    pub fn new<O: Objective + 'static>(
        lower: Vec<f64>,
        upper: Vec<f64>,
        objective: O,
    ) -> Result<Self, SolverError> {
        Ok(Self {
            bounds: Bounds::new(lower, upper)?,
            hints: Vec::new(),
            objective: Arc::new(objective),
            objectives_count: 1,
            comparator: Comparator::default(),
            population_size: 0,
            max_generations: 0,
            batch_size: 16,
            parallel: true,
            seed: None,
        })
    }

    /// Replaces the objective with an already shared one.
    pub fn with_shared_objective(mut self, objective: Arc<dyn Objective>) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_hints(mut self, hints: Vec<Vec<f64>>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_hint(mut self, hint: Vec<f64>) -> Self {
        self.hints.push(hint);
        self
    }

    pub fn with_objectives_count(mut self, count: usize) -> Self {
        self.objectives_count = count;
        self
    }

    /// Uses the built-in comparator with the given strategies.
    pub fn with_comparator(mut self, comparator: FitnessComparator) -> Self {
        self.comparator = Comparator::Builtin(comparator);
        self
    }

    /// Overrides fitness comparison with a caller callback.
    pub fn with_custom_comparator(mut self, comparator: CustomComparator) -> Self {
        self.comparator = Comparator::Custom(comparator);
        self
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the batch size (at least 1).
    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n.max(1);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Problem dimensionality.
    pub fn dim(&self) -> usize {
        self.bounds.dim()
    }

    /// Validates hints and objective count.
    ///
    /// Bounds are validated on construction; they are re-checked here
    /// because the field is public.
    pub fn validate(&self) -> Result<(), SolverError> {
        Bounds::new(self.bounds.lower().to_vec(), self.bounds.upper().to_vec())?;
        if self.objectives_count == 0 || self.objectives_count > MAX_OBJECTIVES {
            return Err(SolverError::InvalidObjectiveCount {
                count: self.objectives_count,
                max: MAX_OBJECTIVES,
            });
        }
        for (index, hint) in self.hints.iter().enumerate() {
            if hint.len() != self.dim() {
                return Err(SolverError::HintDimension {
                    index,
                    expected: self.dim(),
                    got: hint.len(),
                });
            }
        }
        Ok(())
    }

    /// Validates the setup and checks that `V` can hold a candidate.
    pub(crate) fn validate_for<V: Point>(&self) -> Result<(), SolverError> {
        self.validate()?;
        if !V::supports(self.dim()) {
            return Err(SolverError::config(format!(
                "point type holds {:?} dimensions, problem has {}",
                V::fixed_dimension(),
                self.dim()
            )));
        }
        Ok(())
    }

    /// Population size, falling back to `default` when unset.
    pub fn population_or(&self, default: usize) -> usize {
        if self.population_size == 0 {
            default
        } else {
            self.population_size
        }
    }

    /// Generation budget, falling back to `default` when unset.
    pub fn generations_or(&self, default: usize) -> usize {
        if self.max_generations == 0 {
            default
        } else {
            self.max_generations
        }
    }

    /// The hints, clamped into bounds.
    pub(crate) fn clamped_hints<V: Point>(&self) -> Vec<V> {
        self.hints
            .iter()
            .map(|h| {
                let mut p = V::from_slice(h);
                self.bounds.clamp(p.as_mut());
                p
            })
            .collect()
    }

    /// An initial population of `count` points: the clamped hints first,
    /// then Halton points.
    pub(crate) fn initial_population<V: Point, R: Rng>(&self, count: usize, rng: &mut R) -> Vec<V> {
        let mut population: Vec<V> = self.clamped_hints().into_iter().take(count).collect();
        let rest = count - population.len();
        population.extend(halton_points(&self.bounds, rest, rng));
        population
    }

    /// The box center as a point.
    pub(crate) fn midpoint<V: Point>(&self) -> V {
        let mut p = V::filled(self.dim(), 0.0);
        self.bounds.midpoint_into(p.as_mut());
        p
    }

    /// `true` if `a` is strictly better than `b` under this setup's comparator.
    #[inline]
    pub fn is_better(&self, a: &Fitness, b: &Fitness) -> bool {
        self.comparator.is_better(a, b, self.objectives_count)
    }

    /// The master random generator for a solve.
    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        }
    }
}

/// `count` Halton points mapped into the box.
///
/// The sequences use the leading primes and skip a random prefix drawn
/// from `rng`, so a seeded solve reproduces the same placement.
pub(crate) fn halton_points<V: Point, R: Rng>(bounds: &Bounds, count: usize, rng: &mut R) -> Vec<V> {
    let dim = bounds.dim();
    let mut halton = HaltonPoints::leading(dim, rng.random_range(0..1024));
    let mut unit = vec![0.0; dim];
    (0..count)
        .map(|_| {
            halton.next_into(&mut unit);
            let mut p = V::filled(dim, 0.0);
            for (i, (x, &u)) in p.as_mut().iter_mut().zip(&unit).enumerate() {
                *x = bounds.from_unit(i, u);
            }
            p
        })
        .collect()
}

impl std::fmt::Debug for SolverSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverSetup")
            .field("bounds", &self.bounds)
            .field("hints", &self.hints.len())
            .field("objectives_count", &self.objectives_count)
            .field("comparator", &self.comparator)
            .field("population_size", &self.population_size)
            .field("max_generations", &self.max_generations)
            .field("batch_size", &self.batch_size)
            .field("parallel", &self.parallel)
            .field("seed", &self.seed)
            .finish()
    }
}
