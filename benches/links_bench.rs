//! Benchmarks for the quadratic link scan and the particle update loop.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dotfield::{links, Particle, Settings, SettingsInput};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn population(count: usize, width: f32, height: f32) -> Vec<Particle> {
    let settings = Settings::resolve(
        &SettingsInput {
            amount: Some(count as f64),
            ..Default::default()
        },
        width,
        height,
    );
    let mut rng = SmallRng::seed_from_u64(99);
    (0..count).map(|_| settings.spawn(&mut rng)).collect()
}

fn bench_link_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Link Scan");

    for count in [50, 100, 300] {
        let particles = population(count, 1280.0, 720.0);
        group.bench_with_input(BenchmarkId::from_parameter(count), &particles, |b, p| {
            b.iter(|| black_box(links::collect(p, 150.0)));
        });
    }

    group.finish();
}

fn bench_update_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("Update Loop");

    for count in [100, 300] {
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &population(count, 1280.0, 720.0),
            |b, particles| {
                b.iter_batched(
                    || particles.clone(),
                    |mut particles| {
                        for particle in &mut particles {
                            particle.update(1280.0, 720.0);
                        }
                        black_box(particles)
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_link_scan, bench_update_loop);
criterion_main!(benches);
