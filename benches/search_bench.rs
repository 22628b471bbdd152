//! Criterion benchmarks for the backtracking solver.
//!
//! Compares the static baseline against MRV + LCV on generated instances.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_timetable::generator::{GeneratorConfig, InstanceGenerator};
use u_timetable::problem::feasible_sample_spec;
use u_timetable::search::{BacktrackingSolver, SolverConfig};

fn bench_sample(c: &mut Criterion) {
    let graph = match feasible_sample_spec().to_graph() {
        Ok(graph) => graph,
        Err(err) => panic!("sample does not build: {err}"),
    };
    let mut group = c.benchmark_group("sample");
    for flag in [false, true] {
        let solver = BacktrackingSolver::new(SolverConfig::default().with_heuristics(flag));
        group.bench_with_input(BenchmarkId::new("heuristics", flag), &solver, |b, s| {
            b.iter(|| black_box(s.solve(black_box(&graph))))
        });
    }
    group.finish();
}

fn bench_generated(c: &mut Criterion) {
    let mut group = c.benchmark_group("generated");
    group.sample_size(10);

    for (name, config) in [("small", GeneratorConfig::small()), ("medium", GeneratorConfig::medium())] {
        let Ok(graph) = InstanceGenerator::new(config, 42).generate_graph() else {
            continue;
        };
        for flag in [false, true] {
            let solver = BacktrackingSolver::new(
                SolverConfig::default()
                    .with_heuristics(flag)
                    .with_node_limit(50_000),
            );
            let id = BenchmarkId::new(name, if flag { "mrv_lcv" } else { "baseline" });
            group.bench_with_input(id, &solver, |b, s| {
                b.iter(|| black_box(s.solve(black_box(&graph))))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_sample, bench_generated);
criterion_main!(benches);
