//! Derivative Pipeline Benchmarks
//!
//! Measures the stages of the derivative pipeline in isolation and end to
//! end: formula compilation, grid evaluation, the central-difference
//! stencil, and the full per-example computation including validation.
//!
//! ## Benchmark Structure
//!
//! - `compile`: parse + allow-list conversion + constant folding of
//!   expressions of varying complexity (one-time setup cost per formula)
//! - `eval_grid`: interpreting a compiled formula over a 100×100 mesh
//! - `stencil`: the central-difference pass over a sampled 100×100 field
//! - `pipeline`: `calculate_derivatives` for each built-in catalog entry
//!
//! Run with: `cargo bench --bench pipeline`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use meshgrad::catalog::builtin_examples;
use meshgrad::evaluator::Formula;
use meshgrad::mesh::{build_mesh, Domain, MeshSpec};
use meshgrad::pipeline::calculate_derivatives;
use meshgrad::stencil::partial_derivatives;

const EXPRESSIONS: &[(&str, &str)] = &[
    ("linear", "2*x + 3*y"),
    ("quadratic", "x^2 + y^2"),
    ("wave", "sin(x)*cos(y)"),
    ("gaussian", "x*exp(-x^2 - y^2)"),
];

fn benchmark_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for (name, expr) in EXPRESSIONS {
        group.bench_with_input(BenchmarkId::from_parameter(name), expr, |b, expr| {
            b.iter(|| Formula::parse(black_box(expr)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_eval_grid(c: &mut Criterion) {
    let domain = Domain {
        x_min: -2.0,
        x_max: 2.0,
        y_min: -2.0,
        y_max: 2.0,
    };
    let grid = build_mesh(&domain, &MeshSpec { nx: 100, ny: 100 }).unwrap();

    let mut group = c.benchmark_group("eval_grid");
    for (name, expr) in EXPRESSIONS {
        let formula = Formula::parse(expr).unwrap();
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| formula.eval_grid(black_box(&grid.x), black_box(&grid.y)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_stencil(c: &mut Criterion) {
    let domain = Domain {
        x_min: -2.0,
        x_max: 2.0,
        y_min: -2.0,
        y_max: 2.0,
    };
    let grid = build_mesh(&domain, &MeshSpec { nx: 100, ny: 100 }).unwrap();
    let formula = Formula::parse("sin(x)*cos(y)").unwrap();
    let z = formula.eval_grid(&grid.x, &grid.y).unwrap();

    c.bench_function("stencil/100x100", |b| {
        b.iter(|| partial_derivatives(black_box(&z), grid.hx, grid.hy));
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for spec in builtin_examples() {
        group.bench_function(BenchmarkId::from_parameter(&spec.name), |b| {
            b.iter(|| calculate_derivatives(black_box(&spec)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_compile,
    benchmark_eval_grid,
    benchmark_stencil,
    benchmark_pipeline
);
criterion_main!(benches);
