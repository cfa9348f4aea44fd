//! Criterion benchmarks for the u-fitsolve solvers.
//!
//! Sphere functions keep the objective cheap so the numbers reflect solver
//! overhead: evaluation batching, per-candidate updates and dispatch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_fitsolve::metade::MetaDeSolver;
use u_fitsolve::pathfinder::PathfinderSolver;
use u_fitsolve::pso::PsoSolver;
use u_fitsolve::registry::{self, SEQUENTIAL_CONVEX};
use u_fitsolve::sequential::ConvexScanSolver;
use u_fitsolve::solver::{FnObjective, Solver, SolverProgress, SolverSetup};

// ===========================================================================
// Sphere function: minimize sum((x_i - 1)^2) on [-5, 5]^d
// ===========================================================================

fn sphere_setup(dim: usize, population: usize, generations: usize) -> SolverSetup {
    SolverSetup::new(
        vec![-5.0; dim],
        vec![5.0; dim],
        FnObjective::new(|x: &[f64]| x.iter().map(|v| (v - 1.0).powi(2)).sum()),
    )
    .expect("valid bounds")
    .with_population_size(population)
    .with_max_generations(generations)
    .with_seed(42)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_pso_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("pso_sphere");
    group.sample_size(10);

    for parallel in [false, true] {
        let setup = sphere_setup(8, 50, 100).with_parallel(parallel);
        let solver = PsoSolver::default();
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_with_input(BenchmarkId::new("d8_fixed", label), &setup, |b, s| {
            b.iter(|| black_box(solver.solve::<[f64; 8]>(black_box(s), &SolverProgress::new())))
        });
        group.bench_with_input(BenchmarkId::new("d8_vec", label), &setup, |b, s| {
            b.iter(|| black_box(solver.solve::<Vec<f64>>(black_box(s), &SolverProgress::new())))
        });
    }
    group.finish();
}

fn bench_metade_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("metade_sphere");
    group.sample_size(10);

    for (dim, pop, gen) in [(4usize, 40usize, 100usize), (10, 60, 100), (30, 100, 50)] {
        let setup = sphere_setup(dim, pop, gen);
        let solver = MetaDeSolver::default();
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_g{}", dim, pop, gen), dim),
            &setup,
            |b, s| b.iter(|| black_box(solver.solve::<Vec<f64>>(black_box(s), &SolverProgress::new()))),
        );
    }
    group.finish();
}

fn bench_pathfinder_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathfinder_sphere");
    group.sample_size(10);

    for &dim in &[2, 6, 12] {
        let setup = sphere_setup(dim, 40, 50);
        group.bench_with_input(BenchmarkId::from_parameter(dim), &setup, |b, s| {
            b.iter(|| {
                black_box(PathfinderSolver::spiral().solve::<Vec<f64>>(black_box(s), &SolverProgress::new()))
            })
        });
    }
    group.finish();
}

fn bench_convex_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("convex_scan");
    group.sample_size(10);

    for &dim in &[2, 6, 12] {
        let setup = sphere_setup(dim, 0, 60);
        group.bench_with_input(BenchmarkId::new("direct", dim), &setup, |b, s| {
            b.iter(|| {
                black_box(ConvexScanSolver::default().solve::<Vec<f64>>(black_box(s), &SolverProgress::new()))
            })
        });
        group.bench_with_input(BenchmarkId::new("registry", dim), &setup, |b, s| {
            b.iter(|| black_box(registry::solve(&SEQUENTIAL_CONVEX, black_box(s), &SolverProgress::new())))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_pso_sphere,
    bench_metade_sphere,
    bench_pathfinder_sphere,
    bench_convex_dispatch
);
criterion_main!(benches);
