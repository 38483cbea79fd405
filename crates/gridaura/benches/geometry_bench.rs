//! Criterion benchmarks for border generation and per-frame inside tests.
//! Focus radii: {1, 3, 6, 12} cells.
//! Results land under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use gridaura::prelude::*;
use gridaura::{footprint, hex, square};
use rand::{rngs::StdRng, Rng, SeedableRng};

const CELL: f64 = 100.0;

fn random_targets(n: usize, seed: u64) -> Vec<TokenSnapshot> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            TokenSnapshot::new(
                rng.gen_range(-2000.0..2000.0),
                rng.gen_range(-2000.0..2000.0),
                Footprint::new(f64::from(rng.gen_range(1u32..=2)), 1.0),
            )
        })
        .collect()
}

fn bench_borders(c: &mut Criterion) {
    let mut group = c.benchmark_group("border");
    for &r in &[1i64, 3, 6, 12] {
        group.bench_with_input(BenchmarkId::new("square_exact", r), &r, |b, &r| {
            b.iter(|| square::generate_border(2, 2, r, SquareDistanceMode::Exact, CELL))
        });
        group.bench_with_input(BenchmarkId::new("hex_ellipse", r), &r, |b, &r| {
            b.iter(|| hex::generate_outline(3, 3, HexShape::Ellipse1, true, r, CELL))
        });
    }
    group.finish();
}

fn bench_inside(c: &mut Criterion) {
    let mut group = c.benchmark_group("inside");
    let grids = [
        ("gridless", Grid::gridless(CELL)),
        ("square", Grid::square(CELL)),
        ("hex", Grid::hexagonal(CELL, true)),
    ];
    for (name, grid) in grids {
        for &r in &[1.0f64, 6.0] {
            group.bench_with_input(BenchmarkId::new(name, r), &r, |b, &r| {
                let mut cache = GeometryCache::new();
                let geom = AuraGeometry::build(
                    &mut cache,
                    &grid,
                    &Footprint::new(2.0, 2.0),
                    r,
                    SquareDistanceMode::Alternating,
                );
                b.iter_batched(
                    || random_targets(256, 42),
                    |targets| {
                        let mut hits = 0usize;
                        for t in &targets {
                            let cells = footprint::occupied_points(&mut cache, &grid, &t.footprint);
                            if geom.is_inside(t, &cells, Vec2::zeros()) {
                                hits += 1;
                            }
                        }
                        hits
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_borders, bench_inside);
criterion_main!(benches);
