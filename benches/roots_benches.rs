use RustedRoots::numerical::nonlinear_functions::{SymbolicFunction, SymbolicSystem};
use RustedRoots::numerical::roots_api::{Equation, MethodParams, solve};
use RustedRoots::numerical::scalar_roots::{RootFindingConfig, ScalarRootFinder};
use RustedRoots::numerical::system_roots::SystemRootFinder;
use criterion::{Criterion, criterion_group, criterion_main};
use nalgebra::Vector2;
use std::hint::black_box;

fn bench_scalar_methods(c: &mut Criterion) {
    let f = SymbolicFunction::from_equation("sin(x) - x/2 = 0").unwrap();
    let solver = ScalarRootFinder::with_config(RootFindingConfig {
        tolerance: 1e-10,
        max_iterations: 200,
    });
    let mut group = c.benchmark_group("scalar methods");
    group.bench_function("chord", |b| {
        b.iter(|| solver.chord(&f, black_box(1.0), black_box(3.0)))
    });
    group.bench_function("newton", |b| b.iter(|| solver.newton(&f, black_box(2.0))));
    group.bench_function("fixed point", |b| {
        b.iter(|| solver.fixed_point(&f, black_box(-1.0), black_box(2.0)))
    });
    group.finish();
}

fn bench_system(c: &mut Criterion) {
    let system = SymbolicSystem::from_equations("x^2 + y^2 -1 = 0", "x^3 - y = 0").unwrap();
    let solver = SystemRootFinder::with_config(RootFindingConfig {
        tolerance: 1e-8,
        max_iterations: 500,
    });
    c.bench_function("damped fixed point", |b| {
        b.iter(|| solver.damped_fixed_point(&system, black_box(-0.3), Vector2::new(-1.0, -1.0)))
    });
}

/// parsing, differentiation and compilation included
fn bench_solve_from_strings(c: &mut Criterion) {
    let equation = Equation::single("e^x + x = 0");
    let params = MethodParams::Newton {
        x0: 0.0,
        eps: 1e-10,
        max_iter: 50,
    };
    c.bench_function("solve from string", |b| {
        b.iter(|| solve(black_box(&equation), black_box(&params)))
    });
}

criterion_group!(benches, bench_scalar_methods, bench_system, bench_solve_from_strings);
criterion_main!(benches);
