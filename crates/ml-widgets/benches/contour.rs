//! Benchmarks for grid sampling and marching squares.

use criterion::*;

use ml_widgets::{
    contour::{chains, contour, Bounds, Grid},
    Point,
};

/// Three overlapping bumps, so the contour has several pieces.
fn bumps(p: Point) -> f64 {
    [(-0.4, 0.3), (0.35, 0.2), (0.0, -0.5)]
        .into_iter()
        .map(|(x, y)| (-8.0 * p.distance_sq(&Point::new(x, y))).exp())
        .sum()
}

fn marching_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("marching-squares");
    group.significance_level(0.05).sample_size(50);

    for resolution in [50, 100, 200] {
        let id = BenchmarkId::new("Sample", resolution);
        group.bench_with_input(id, &resolution, |b, &r| {
            b.iter_with_large_drop(|| Grid::sample(Bounds::UNIT_SQUARE, r, r, bumps));
        });

        let id = BenchmarkId::new("ParSample", resolution);
        group.bench_with_input(id, &resolution, |b, &r| {
            b.iter_with_large_drop(|| Grid::par_sample(Bounds::UNIT_SQUARE, r, r, bumps));
        });

        let Ok(grid) = Grid::par_sample(Bounds::UNIT_SQUARE, resolution, resolution, bumps) else {
            continue;
        };
        let id = BenchmarkId::new("Contour", resolution);
        group.bench_with_input(id, &grid, |b, grid| {
            b.iter_with_large_drop(|| contour(grid, 0.5));
        });

        let segments = contour(&grid, 0.5);
        let id = BenchmarkId::new("Chains", resolution);
        group.bench_with_input(id, &segments, |b, segments| {
            b.iter_with_large_drop(|| chains(segments));
        });
    }

    group.finish();
}

criterion_group!(benches, marching_squares);
criterion_main!(benches);
