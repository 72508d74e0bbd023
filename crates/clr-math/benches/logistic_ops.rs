//! Criterion benchmarks for `clr-math`.
//!
//! Focus on the kernels evaluated once per scoring call.

use clr_math::{logit, stable_sigmoid};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_logistic_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("logistic");

    for (name, x) in [
        ("zero", 0.0),
        ("moderate_pos", 2.5),
        ("moderate_neg", -2.5),
        ("saturated", 750.0),
    ] {
        group.bench_with_input(BenchmarkId::new("stable_sigmoid", name), &x, |b, &x| {
            b.iter(|| black_box(stable_sigmoid(black_box(x))));
        });
    }

    for (name, p) in [("interior", 0.37), ("edge_low", 0.0), ("edge_high", 1.0)] {
        group.bench_with_input(BenchmarkId::new("logit", name), &p, |b, &p| {
            b.iter(|| black_box(logit(black_box(p))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_logistic_kernels);
criterion_main!(benches);
