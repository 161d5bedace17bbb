// SPDX-License-Identifier: Apache-2.0

use criterion::{criterion_group, criterion_main, Criterion};
use lidargrid::{
    config::{GridConfig, GridParams},
    pipeline::Pipeline,
    plane::RansacPlaneFitter,
    Points,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

/// Synthetic forward-facing scene: flat ground plus scattered obstacles.
fn synthetic_cloud(points: usize, seed: u64) -> Points {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cloud = Points::with_capacity(points);

    for _ in 0..points {
        let range = rng.random_range(3.0f32..48.0);
        let angle = rng.random_range(-0.7f32..0.7);
        let x = range * angle.cos();
        let y = -range * angle.sin();

        // One point in ten belongs to an obstacle above the ground.
        let z = if rng.random_range(0..10) == 0 {
            rng.random_range(-1.7f32..0.5)
        } else {
            -1.73 + rng.random_range(-0.03f32..0.03)
        };
        cloud.push(x, y, z, rng.random_range(0..=255));
    }

    cloud
}

fn bench_process(c: &mut Criterion) {
    let config = GridConfig::new(GridParams::default());
    let mut pipeline = Pipeline::with_fitter(config, RansacPlaneFitter::seeded(7));
    let cloud = synthetic_cloud(30_000, 99);

    c.bench_function("pipeline_process_30k", |b| {
        let mut frame = 0u32;
        b.iter(|| {
            let output = pipeline.process(black_box(frame), black_box(&cloud));
            frame = frame.wrapping_add(1);
            black_box(output.filtered.len())
        })
    });
}

fn bench_binning(c: &mut Criterion) {
    use lidargrid::{binner, grid::PolarGrid};

    let config = GridConfig::new(GridParams::default());
    let mut grid = PolarGrid::new(&config);
    let cloud = synthetic_cloud(30_000, 99);

    c.bench_function("bin_cloud_30k", |b| {
        b.iter(|| {
            grid.reset();
            let filtered = binner::bin_cloud(black_box(&config), black_box(&cloud), &mut grid);
            black_box(filtered.len())
        })
    });
}

criterion_group!(benches, bench_process, bench_binning);
criterion_main!(benches);
