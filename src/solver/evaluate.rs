//! Batched, data-parallel objective evaluation and incumbent tracking.

use super::point::Point;
use super::progress::SolverProgress;
use super::setup::SolverSetup;
use super::SolveOutcome;
use crate::error::Status;
use crate::fitness::pareto::pareto_front_indices;
use crate::fitness::Fitness;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Evaluates candidates through the setup's objective.
///
/// Candidates are split into batches of `setup.batch_size`; batches run on
/// the rayon pool when `setup.parallel` is set. A batch whose call reports
/// failure is scored `NaN`, and any candidate with an invalid objective is
/// sanitized to `NaN` in every slot.
pub(crate) struct Evaluator<'a> {
    setup: &'a SolverSetup,
    evaluations: AtomicUsize,
}

impl<'a> Evaluator<'a> {
    pub fn new(setup: &'a SolverSetup) -> Self {
        Self {
            setup,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Total candidates evaluated so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Evaluates every point.
    pub fn evaluate<V: Point>(&self, points: &[V]) -> Vec<Fitness> {
        let count = self.setup.objectives_count;
        let batch = self.setup.batch_size.max(1);
        let mut fitness = vec![Fitness::failed(count); points.len()];

        if self.setup.parallel && points.len() > batch {
            points
                .par_chunks(batch)
                .zip(fitness.par_chunks_mut(batch))
                .for_each(|(chunk, out)| self.evaluate_batch(chunk, out));
        } else {
            for (chunk, out) in points.chunks(batch).zip(fitness.chunks_mut(batch)) {
                self.evaluate_batch(chunk, out);
            }
        }

        self.evaluations.fetch_add(points.len(), Ordering::Relaxed);
        fitness
    }

    /// Evaluates a single point.
    pub fn evaluate_one<V: Point>(&self, point: &V) -> Fitness {
        let mut out = [Fitness::failed(self.setup.objectives_count)];
        self.evaluate_batch(std::slice::from_ref(point), &mut out);
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        out[0]
    }

    fn evaluate_batch<V: Point>(&self, chunk: &[V], out: &mut [Fitness]) {
        debug_assert!(chunk
            .iter()
            .all(|p| self.setup.bounds.contains(p.as_ref())));

        let refs: Vec<&[f64]> = chunk.iter().map(|p| p.as_ref()).collect();
        let count = self.setup.objectives_count;
        if !self.setup.objective.evaluate(&refs, out) {
            tracing::warn!(batch = chunk.len(), "objective reported a failed batch");
            out.fill(Fitness::failed(count));
            return;
        }
        for f in out.iter_mut() {
            if f.len() != count {
                *f = Fitness::failed(count);
            } else {
                f.sanitize();
            }
        }
    }
}

/// The best candidate of a solve plus its per-generation history.
#[derive(Debug, Clone)]
pub(crate) struct Incumbent<V: Point> {
    pub position: V,
    pub fitness: Fitness,
    pub history: Vec<Fitness>,
}

impl<V: Point> Incumbent<V> {
    pub fn new(position: V, fitness: Fitness) -> Self {
        Self {
            position,
            fitness,
            history: Vec::new(),
        }
    }

    /// Seeds from the best of an evaluated population.
    ///
    /// `positions` must not be empty.
    pub fn from_population(setup: &SolverSetup, positions: &[V], fitness: &[Fitness]) -> Self {
        let best = best_index(setup, fitness);
        Self::new(positions[best].clone(), fitness[best])
    }

    /// Adopts the candidate if it is strictly better. Returns `true` on adoption.
    pub fn offer(&mut self, setup: &SolverSetup, position: &V, fitness: &Fitness) -> bool {
        if setup.is_better(fitness, &self.fitness) {
            self.position = position.clone();
            self.fitness = *fitness;
            true
        } else {
            false
        }
    }

    /// Offers the best member of an evaluated population.
    pub fn offer_population(&mut self, setup: &SolverSetup, positions: &[V], fitness: &[Fitness]) -> bool {
        if positions.is_empty() {
            return false;
        }
        let best = best_index(setup, fitness);
        self.offer(setup, &positions[best], &fitness[best])
    }

    /// Closes a generation: records history and publishes progress.
    pub fn record(&mut self, generation: usize, progress: &SolverProgress) {
        self.history.push(self.fitness);
        progress.publish(generation, &self.fitness, self.position.as_ref());
    }

    /// Builds the outcome of the solve.
    ///
    /// `archive` is the final population (or any candidate set) from which
    /// the Pareto front of a multi-objective solve is extracted.
    pub fn into_outcome(
        self,
        setup: &SolverSetup,
        status: Status,
        generations: usize,
        evaluations: usize,
        archive: &[(V, Fitness)],
    ) -> SolveOutcome {
        let pareto_front = if setup.objectives_count > 1 {
            let fitness: Vec<Fitness> = archive.iter().map(|(_, f)| *f).collect();
            pareto_front_indices(&fitness, setup.objectives_count)
                .into_iter()
                .map(|i| archive[i].0.as_ref().to_vec())
                .collect()
        } else {
            Vec::new()
        };

        SolveOutcome {
            solution: self.position.as_ref().to_vec(),
            fitness: self.fitness,
            status,
            generations,
            evaluations,
            history: self.history,
            pareto_front,
        }
    }
}

/// Index of the best fitness under the setup's comparator.
///
/// Linear scan keeping the first of equally good candidates.
pub(crate) fn best_index(setup: &SolverSetup, fitness: &[Fitness]) -> usize {
    let mut best = 0;
    for (i, f) in fitness.iter().enumerate().skip(1) {
        if setup.is_better(f, &fitness[best]) {
            best = i;
        }
    }
    best
}

/// Runs `f` on every item with its own generator seeded from `rng`.
///
/// Seeds are drawn sequentially before the parallel phase, so the result
/// does not depend on thread scheduling.
pub(crate) fn for_each_seeded<T, F>(parallel: bool, items: &mut [T], rng: &mut StdRng, f: F)
where
    T: Send,
    F: Fn(usize, &mut T, &mut StdRng) + Send + Sync,
{
    let seeds: Vec<u64> = (0..items.len()).map(|_| rng.random()).collect();
    if parallel {
        items
            .par_iter_mut()
            .zip(seeds.par_iter())
            .enumerate()
            .for_each(|(i, (item, &seed))| f(i, item, &mut StdRng::seed_from_u64(seed)));
    } else {
        for (i, (item, &seed)) in items.iter_mut().zip(&seeds).enumerate() {
            f(i, item, &mut StdRng::seed_from_u64(seed));
        }
    }
}
