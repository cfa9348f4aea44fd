//! End-to-end scenarios through the registry: every registered solver must
//! honor the shared contract.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use u_fitsolve::error::{SolverError, Status};
use u_fitsolve::fitness::Fitness;
use u_fitsolve::pso::PsoSolver;
use u_fitsolve::registry::{self, METADE, PSO, SEQUENTIAL_CONVEX};
use u_fitsolve::solver::{FnObjective, MultiFnObjective, Solver, SolverProgress, SolverSetup};
use uuid::Uuid;

fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

fn ids() -> Vec<(Uuid, &'static str)> {
    registry::descriptors().iter().map(|d| (d.id, d.name)).collect()
}

// ===========================================================================
// Convergence
// ===========================================================================

#[test]
fn unit_square_sphere_reaches_origin() {
    for id in [PSO, METADE, SEQUENTIAL_CONVEX] {
        let setup = SolverSetup::new(vec![0.0, 0.0], vec![1.0, 1.0], FnObjective::new(sphere))
            .unwrap()
            .with_population_size(30)
            .with_max_generations(50)
            .with_seed(11);
        let progress = SolverProgress::new();
        let outcome = registry::solve_detailed(&id, &setup, &progress).unwrap();
        assert_eq!(outcome.status, Status::Ok);
        assert!(outcome.best_metric() < 1e-3, "{id}: {}", outcome.best_metric());
        assert_eq!(progress.best_solution(), Some(outcome.solution.clone()));
    }
}

#[test]
fn history_never_worsens() {
    for (id, name) in ids() {
        let setup = SolverSetup::new(
            vec![-3.0; 3],
            vec![3.0; 3],
            FnObjective::new(|x: &[f64]| sphere(x) + (3.0 * x[0]).sin()),
        )
        .unwrap()
        .with_population_size(12)
        .with_max_generations(15)
        .with_seed(5);
        let outcome = registry::solve_detailed(&id, &setup, &SolverProgress::new()).unwrap();
        assert_eq!(outcome.history.len(), outcome.generations + 1, "{name}");
        for w in outcome.history.windows(2) {
            assert!(w[1].primary() <= w[0].primary(), "{name}: {:?}", outcome.history);
        }
        assert_eq!(outcome.history.last().map(|f| f.primary()), Some(outcome.best_metric()));
    }
}

// ===========================================================================
// Bounds
// ===========================================================================

#[test]
fn fixed_dimension_is_never_perturbed() {
    for (id, name) in ids() {
        let moved = Arc::new(AtomicBool::new(false));
        let flag = moved.clone();
        let setup = SolverSetup::new(
            vec![0.0, 0.3, -1.0],
            vec![1.0, 0.3, 1.0],
            FnObjective::new(move |x: &[f64]| {
                if x[1] != 0.3 {
                    flag.store(true, Ordering::Relaxed);
                }
                (x[0] - 0.6).powi(2) + x[2].abs()
            }),
        )
        .unwrap()
        .with_hint(vec![0.9, 0.8, 0.5])
        .with_population_size(10)
        .with_max_generations(10)
        .with_seed(2);
        let outcome = registry::solve_detailed(&id, &setup, &SolverProgress::new()).unwrap();
        assert!(!moved.load(Ordering::Relaxed), "{name} evaluated a moved fixed dimension");
        assert_eq!(outcome.solution[1], 0.3, "{name}");
    }
}

#[test]
fn all_fixed_dimensions_still_solve() {
    for (id, name) in ids() {
        let setup = SolverSetup::new(vec![2.0, -1.0], vec![2.0, -1.0], FnObjective::new(sphere))
            .unwrap()
            .with_population_size(6)
            .with_max_generations(4)
            .with_seed(1);
        let outcome = registry::solve_detailed(&id, &setup, &SolverProgress::new()).unwrap();
        assert_eq!(outcome.solution, vec![2.0, -1.0], "{name}");
        assert_eq!(outcome.best_metric(), 5.0, "{name}");
    }
}

// ===========================================================================
// Cancellation
// ===========================================================================

#[test]
fn cancelled_before_start_returns_evaluated_incumbent() {
    for (id, name) in ids() {
        let setup = SolverSetup::new(vec![-1.0; 4], vec![1.0; 4], FnObjective::new(sphere))
            .unwrap()
            .with_population_size(8)
            .with_max_generations(100);
        let progress = SolverProgress::new();
        progress.cancel();
        assert_eq!(registry::solve(&id, &setup, &progress), Status::Aborted, "{name}");

        let solution = progress.best_solution().unwrap_or_default();
        assert_eq!(solution.len(), 4, "{name}");
        assert!(solution.iter().all(|v| (-1.0..=1.0).contains(v)), "{name}");
        assert!(progress.best_metric().is_finite(), "{name}");
    }
}

#[test]
fn cancelled_mid_run_stops_at_generation_boundary() {
    for (id, name) in ids() {
        let progress = Arc::new(SolverProgress::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let (p, c) = (progress.clone(), calls.clone());
        let setup = SolverSetup::new(
            vec![-2.0; 2],
            vec![2.0; 2],
            FnObjective::new(move |x: &[f64]| {
                if c.fetch_add(1, Ordering::Relaxed) == 15 {
                    p.cancel();
                }
                (x[0] - 0.7).powi(2) + (x[1] - 0.7).powi(2) + 1.0
            }),
        )
        .unwrap()
        .with_population_size(10)
        .with_max_generations(1000)
        .with_seed(9);

        let outcome = registry::solve_detailed(&id, &setup, &progress).unwrap();
        assert_eq!(outcome.status, Status::Aborted, "{name}");
        assert!(outcome.cancelled());
        assert!(outcome.generations < 1000, "{name}");
        assert!(outcome.best_metric() >= 1.0);
        assert_eq!(outcome.evaluations, calls.load(Ordering::Relaxed), "{name}");
    }
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn unknown_identifier_is_not_implemented() {
    let setup = SolverSetup::new(vec![0.0], vec![1.0], FnObjective::new(sphere)).unwrap();
    let id = Uuid::from_u128(0xdead_beef);
    assert_eq!(registry::solve(&id, &setup, &SolverProgress::new()), Status::NotImplemented);
    assert_eq!(
        registry::solve_detailed(&id, &setup, &SolverProgress::new()).unwrap_err(),
        SolverError::NotImplemented(id)
    );
}

#[test]
fn inverted_bounds_are_rejected() {
    let err = SolverSetup::new(vec![0.0, 1.0], vec![1.0, 0.0], FnObjective::new(sphere)).unwrap_err();
    assert_eq!(err.status(), Status::InvalidArgument);
    assert!(matches!(err, SolverError::InvalidBounds { index: 1, .. }));
}

#[test]
fn panicking_objective_reports_failure() {
    for (id, name) in ids() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let setup = SolverSetup::new(
            vec![0.0; 3],
            vec![1.0; 3],
            FnObjective::new(move |x: &[f64]| {
                if c.fetch_add(1, Ordering::Relaxed) >= 5 {
                    panic!("integrator diverged");
                }
                sphere(x)
            }),
        )
        .unwrap()
        .with_population_size(8)
        .with_max_generations(20)
        .with_parallel(false);
        let progress = SolverProgress::new();
        assert_eq!(registry::solve(&id, &setup, &progress), Status::Failed, "{name}");
    }
}

#[test]
fn failing_objective_yields_nan_fitness() {
    for (id, name) in ids() {
        let setup = SolverSetup::new(
            vec![0.0; 2],
            vec![1.0; 2],
            MultiFnObjective::new(|_: &[f64], _: &mut [f64]| false),
        )
        .unwrap()
        .with_population_size(6)
        .with_max_generations(5)
        .with_seed(4);
        let outcome = registry::solve_detailed(&id, &setup, &SolverProgress::new()).unwrap();
        assert_eq!(outcome.status, Status::Ok, "{name}");
        assert!(outcome.best_metric().is_nan(), "{name}");
        assert!(outcome.solution.iter().all(|v| (0.0..=1.0).contains(v)), "{name}");
    }
}

#[test]
fn failing_objective_returns_an_evaluated_point() {
    for (id, name) in ids() {
        let seen: Arc<Mutex<Vec<Vec<f64>>>> = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let setup = SolverSetup::new(
            vec![0.0; 3],
            vec![1.0; 3],
            MultiFnObjective::new(move |x: &[f64], _: &mut [f64]| {
                log.lock().unwrap().push(x.to_vec());
                false
            }),
        )
        .unwrap()
        .with_population_size(6)
        .with_max_generations(5)
        .with_seed(4);
        let outcome = registry::solve_detailed(&id, &setup, &SolverProgress::new()).unwrap();
        assert!(outcome.best_metric().is_nan(), "{name}");
        assert!(
            seen.lock().unwrap().contains(&outcome.solution),
            "{name} returned a point it never evaluated: {:?}",
            outcome.solution
        );
    }
}

#[test]
fn nan_config_is_rejected_before_solving() {
    let setup = SolverSetup::new(vec![0.0; 2], vec![1.0; 2], FnObjective::new(sphere)).unwrap();
    let config = u_fitsolve::pso::PsoConfig::default().with_max_velocity_fraction(f64::NAN);
    let err = PsoSolver::new(config)
        .solve::<[f64; 2]>(&setup, &SolverProgress::new())
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidArgument);
}

#[test]
fn mismatched_point_type_is_an_error() {
    let setup = SolverSetup::new(vec![0.0; 3], vec![1.0; 3], FnObjective::new(sphere))
        .unwrap()
        .with_hint(vec![0.5; 3]);
    let err = PsoSolver::default()
        .solve::<[f64; 4]>(&setup, &SolverProgress::new())
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidArgument);
}

// ===========================================================================
// Comparators
// ===========================================================================

#[test]
fn custom_comparator_maximizes() {
    // Peak of 2.0 at (0.8, 0.2); the box center scores 1.82.
    let peak = |x: &[f64]| 2.0 - (x[0] - 0.8).powi(2) - (x[1] - 0.2).powi(2);
    for (id, name) in ids() {
        let setup = SolverSetup::new(vec![0.0; 2], vec![1.0; 2], FnObjective::new(peak))
            .unwrap()
            .with_custom_comparator(Arc::new(|a: &Fitness, b: &Fitness| a.primary() > b.primary()))
            .with_population_size(20)
            .with_max_generations(40)
            .with_seed(13);
        let outcome = registry::solve_detailed(&id, &setup, &SolverProgress::new()).unwrap();
        assert_eq!(outcome.status, Status::Ok, "{name}");
        assert!(outcome.best_metric() > 1.95, "{name}: {}", outcome.best_metric());
        assert_eq!(outcome.best_metric(), peak(&outcome.solution), "{name}");
        for w in outcome.history.windows(2) {
            assert!(w[1].primary() >= w[0].primary(), "{name}: {:?}", outcome.history);
        }
    }
}

// ===========================================================================
// Multi-objective
// ===========================================================================

#[test]
fn two_objectives_return_a_front() {
    let setup = SolverSetup::new(
        vec![0.0],
        vec![1.0],
        MultiFnObjective::new(|x: &[f64], out: &mut [f64]| {
            out[0] = x[0];
            out[1] = (1.0 - x[0]).powi(2);
            true
        }),
    )
    .unwrap()
    .with_objectives_count(2)
    .with_population_size(20)
    .with_max_generations(20)
    .with_seed(8);

    let outcome = registry::solve_detailed(&METADE, &setup, &SolverProgress::new()).unwrap();
    assert!(!outcome.pareto_front.is_empty());
    assert!(outcome.pareto_front.iter().all(|p| p.len() == 1 && (0.0..=1.0).contains(&p[0])));
}
