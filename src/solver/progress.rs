//! Externally visible solve progress and cooperative cancellation.

use crate::fitness::Fitness;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// The best candidate published so far.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSnapshot {
    /// Fitness of the best candidate.
    pub fitness: Fitness,
    /// Position of the best candidate.
    pub solution: Vec<f64>,
}

/// Progress record shared between a running solver and its caller.
///
/// The solver writes it once per generation; the caller may read it, or
/// request cancellation, at any time from any thread. Fields are updated
/// independently, so a reader may briefly see a generation counter that is
/// one step ahead of the best fitness.
///
/// # Examples
///
/// ```
/// use u_fitsolve::solver::SolverProgress;
///
/// let progress = SolverProgress::new();
/// assert!(!progress.is_cancelled());
/// progress.cancel();
/// assert!(progress.is_cancelled());
/// ```
#[derive(Debug, Default)]
pub struct SolverProgress {
    current: AtomicUsize,
    max: AtomicUsize,
    cancelled: AtomicBool,
    best: Mutex<Option<BestSnapshot>>,
}

impl SolverProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cooperative cancellation. Observed at the next generation
    /// boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Generations completed so far.
    pub fn current_progress(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    /// Generation budget of the running solve.
    pub fn max_progress(&self) -> usize {
        self.max.load(Ordering::Relaxed)
    }

    /// Fitness of the best candidate published so far.
    pub fn best_fitness(&self) -> Option<Fitness> {
        self.lock().as_ref().map(|b| b.fitness)
    }

    /// First objective of the best fitness, or NaN before any publication.
    pub fn best_metric(&self) -> f64 {
        self.best_fitness().map_or(f64::NAN, |f| f.primary())
    }

    /// Position of the best candidate published so far.
    pub fn best_solution(&self) -> Option<Vec<f64>> {
        self.lock().as_ref().map(|b| b.solution.clone())
    }

    /// Both fitness and position of the best candidate.
    pub fn snapshot(&self) -> Option<BestSnapshot> {
        self.lock().clone()
    }

    /// Resets counters for a new solve. The cancellation flag is kept so a
    /// cancel issued before the solve started is still honored.
    pub(crate) fn begin(&self, max_generations: usize) {
        self.current.store(0, Ordering::Relaxed);
        self.max.store(max_generations, Ordering::Relaxed);
        *self.lock() = None;
    }

    /// Publishes the generation counter and the incumbent best.
    pub(crate) fn publish(&self, generation: usize, fitness: &Fitness, solution: &[f64]) {
        {
            let mut best = self.lock();
            match best.as_mut() {
                Some(b) if b.fitness == *fitness && b.solution == solution => {}
                Some(b) => {
                    b.fitness = *fitness;
                    b.solution.clear();
                    b.solution.extend_from_slice(solution);
                }
                None => {
                    *best = Some(BestSnapshot {
                        fitness: *fitness,
                        solution: solution.to_vec(),
                    })
                }
            }
        }
        self.current.store(generation, Ordering::Relaxed);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<BestSnapshot>> {
        self.best.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_begin_keeps_cancellation() {
        let p = SolverProgress::new();
        p.cancel();
        p.begin(10);
        assert!(p.is_cancelled());
        assert_eq!(p.max_progress(), 10);
        assert_eq!(p.current_progress(), 0);
        assert!(p.best_fitness().is_none());
        assert!(p.best_metric().is_nan());
    }

    #[test]
    fn test_publish() {
        let p = SolverProgress::new();
        p.begin(5);
        p.publish(1, &Fitness::single(3.0), &[0.1, 0.2]);
        p.publish(2, &Fitness::single(1.0), &[0.3, 0.4]);
        assert_eq!(p.current_progress(), 2);
        assert_eq!(p.best_metric(), 1.0);
        assert_eq!(p.best_solution(), Some(vec![0.3, 0.4]));
    }

    #[test]
    fn test_concurrent_reads() {
        let p = Arc::new(SolverProgress::new());
        p.begin(1000);
        let reader = {
            let p = Arc::clone(&p);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let _ = p.best_metric();
                    let _ = p.current_progress();
                }
            })
        };
        for g in 0..1000 {
            p.publish(g, &Fitness::single(1000.0 - g as f64), &[g as f64]);
        }
        reader.join().unwrap();
        assert_eq!(p.best_metric(), 1.0);
    }
}
