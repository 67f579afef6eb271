//! Data generation utilities for testing.

#![allow(dead_code)]

use ml_widgets::Point;
use planegen::{clusters, Canvas};
use rand::prelude::*;

/// Three tight groups of four points, far apart.
pub fn three_groups() -> Vec<Point> {
    [(10.0, 10.0), (100.0, 10.0), (55.0, 100.0)]
        .into_iter()
        .flat_map(|(cx, cy)| {
            [(0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (3.0, 3.0)]
                .into_iter()
                .map(move |(dx, dy)| Point::new(cx + dx, cy + dy))
        })
        .collect()
}

/// A `side × side` lattice with unit spacing.
pub fn lattice(side: usize) -> Vec<Point> {
    (0..side)
        .flat_map(|i| (0..side).map(move |j| Point::new(i as f64, j as f64)))
        .collect()
}

/// The DBSCAN demo's moons, seeded.
pub fn moons(seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    clusters::moons(&Canvas::default(), &clusters::MoonParams::default(), &mut rng)
        .into_iter()
        .map(Point::from)
        .collect()
}

/// The hierarchical demo's blobs, seeded.
pub fn small_blobs(seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    clusters::blobs(&Canvas::default(), &clusters::BlobParams::hierarchical(), &mut rng)
        .into_iter()
        .map(Point::from)
        .collect()
}

/// The k-means demo's blobs, seeded.
pub fn kmeans_blobs(seed: u64) -> Vec<Point> {
    let canvas = Canvas::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let params = clusters::BlobParams::kmeans(&canvas, &mut rng);
    clusters::blobs(&canvas, &params, &mut rng)
        .into_iter()
        .map(Point::from)
        .collect()
}
