// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eikonal_fmm::core::{Field, Seed};
use eikonal_fmm::solver::FmmSolver;
use eikonal_fmm::weights::WeightMap;

fn unit_field(n: usize) -> Field {
    Field::filled(n, n, 1.0).unwrap()
}

/// Smooth bumpy field so the derived cost maps are not trivially zero.
fn bumpy_field(n: usize) -> Field {
    let data = (0..n * n)
        .map(|i| {
            let x = (i % n) as f64;
            let y = (i / n) as f64;
            1.0 + 0.5 * (0.05 * x).sin() * (0.07 * y).cos()
        })
        .collect();
    Field::new(n, n, data).unwrap()
}

fn center_seed(n: usize) -> [Seed; 1] {
    [Seed::new(n / 2, n / 2)]
}

/// Baseline: 512^2 homogeneous, identity weights.
fn bench_unit_512(c: &mut Criterion) {
    let field = unit_field(512);
    let seeds = center_seed(512);
    let solver = FmmSolver::new();
    c.bench_function("2d_512x512_identity", |b| {
        b.iter(|| black_box(solver.solve(&field, &seeds).unwrap()));
    });
}

/// Each weight map on the same 512^2 field.
fn bench_weight_maps(c: &mut Criterion) {
    let field = bumpy_field(512);
    let seeds = center_seed(512);
    let mut group = c.benchmark_group("weight_maps_512x512");
    for weight_map in WeightMap::ALL {
        let solver = FmmSolver::new().with_weight_map(weight_map);
        group.bench_function(weight_map.name(), |b| {
            b.iter(|| black_box(solver.solve(&field, &seeds).unwrap()));
        });
    }
    group.finish();
}

/// Grid size scaling with a single centre seed.
fn bench_grid_size_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_size_scaling");
    for &n in &[128, 256, 512, 1024] {
        let field = unit_field(n);
        let seeds = center_seed(n);
        let solver = FmmSolver::new();
        group.bench_function(format!("{}x{}", n, n), |b| {
            b.iter(|| black_box(solver.solve(&field, &seeds).unwrap()));
        });
    }
    group.finish();
}

/// Early stopping: visit budgets and thresholds on a 1024^2 field.
fn bench_early_stop(c: &mut Criterion) {
    let n = 1024;
    let field = unit_field(n);
    let seeds = center_seed(n);
    let mut group = c.benchmark_group("early_stop_1024x1024");
    for &budget in &[1_000_i64, 100_000] {
        let solver = FmmSolver::new().with_max_visits(budget).unwrap();
        group.bench_function(format!("max_visits_{}", budget), |b| {
            b.iter(|| black_box(solver.solve(&field, &seeds).unwrap()));
        });
    }
    let solver = FmmSolver::new()
        .with_normalize_output(false)
        .with_segmentation_threshold(64.0)
        .unwrap();
    group.bench_function("threshold_64", |b| {
        b.iter(|| black_box(solver.solve(&field, &seeds).unwrap()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_unit_512,
    bench_weight_maps,
    bench_grid_size_scaling,
    bench_early_stop,
);
criterion_main!(benches);
