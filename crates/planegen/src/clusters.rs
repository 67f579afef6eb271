//! Unlabelled point clouds for the clustering demos.
//!
//! All generators clamp their output to the canvas margin.

use core::f64::consts::PI;

use rand::prelude::*;

use crate::{clamp, jitter, Canvas};

/// Parameters of [`blobs`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobParams {
    /// The number of blob centers.
    pub centers: usize,
    /// The number of points.
    pub n: usize,
    /// The width and height of the square around a center that its points
    /// fall in.
    pub spread: [f64; 2],
    /// The fraction of points scattered uniformly over the canvas instead.
    pub noise_fraction: f64,
    /// The distance from the edges within which centers are placed.
    pub padding: f64,
}

impl Default for BlobParams {
    /// Three tight blobs with 30% background noise, as in the DBSCAN demo.
    fn default() -> Self {
        Self {
            centers: 3,
            n: 60,
            spread: [60.0, 60.0],
            noise_fraction: 0.3,
            padding: 50.0,
        }
    }
}

impl BlobParams {
    /// Fifteen points in three loose blobs, as in the hierarchical demo.
    #[must_use]
    pub const fn hierarchical() -> Self {
        Self {
            centers: 3,
            n: 15,
            spread: [80.0, 80.0],
            noise_fraction: 0.0,
            padding: 50.0,
        }
    }

    /// Two to four wide blobs of 40 to 69 points, as in the k-means demo.
    pub fn kmeans<R: Rng>(canvas: &Canvas, rng: &mut R) -> Self {
        Self {
            centers: rng.gen_range(2..=4),
            n: rng.gen_range(40..70),
            spread: [canvas.width / 4.0, canvas.height / 4.0],
            noise_fraction: 0.0,
            padding: 50.0,
        }
    }
}

/// Points scattered around randomly placed centers, with some uniform noise.
pub fn blobs<R: Rng>(canvas: &Canvas, params: &BlobParams, rng: &mut R) -> Vec<[f64; 2]> {
    let centers = (0..params.centers.max(1))
        .map(|_| canvas.random_point(params.padding, rng))
        .collect::<Vec<_>>();

    let mut points = (0..params.n)
        .map(|_| {
            if rng.gen::<f64>() < params.noise_fraction {
                canvas.random_point(0.0, rng)
            } else {
                let [cx, cy] = centers[rng.gen_range(0..centers.len())];
                [cx + jitter(params.spread[0], rng), cy + jitter(params.spread[1], rng)]
            }
        })
        .collect::<Vec<_>>();
    clamp(&mut points, canvas);
    points
}

/// Parameters of [`moons`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonParams {
    /// The number of points on the moons, split evenly between them.
    pub n: usize,
    /// The radius of each moon.
    pub radius: f64,
    /// The horizontal distance between the moon centers.
    pub offset: f64,
    /// The width of the uniform jitter on each coordinate.
    pub jitter: f64,
    /// Add `n / 10` uniformly scattered points.
    pub noise: bool,
}

impl Default for MoonParams {
    /// The DBSCAN demo's moons.
    fn default() -> Self {
        Self {
            n: 100,
            radius: 100.0,
            offset: 100.0,
            jitter: 10.0,
            noise: true,
        }
    }
}

impl MoonParams {
    /// The hierarchical demo's smaller moons.
    #[must_use]
    pub const fn hierarchical() -> Self {
        Self {
            n: 20,
            radius: 80.0,
            offset: 70.0,
            jitter: 10.0,
            noise: false,
        }
    }
}

/// Two interleaved half circles: the upper one opening downwards and the
/// lower one, shifted right by `offset`, opening upwards.
pub fn moons<R: Rng>(canvas: &Canvas, params: &MoonParams, rng: &mut R) -> Vec<[f64; 2]> {
    let [cx, cy] = canvas.center();
    let (x0, y0) = (cx - 50.0, cy + 50.0);
    let half = params.n / 2;

    let mut points = Vec::with_capacity(params.n + params.n / 10 + 1);
    for (dx, dir) in [(0.0, -1.0), (params.offset, 1.0)] {
        for i in 0..half {
            #[allow(clippy::cast_precision_loss)]
            let angle = PI * (i as f64) / (half as f64);
            points.push([
                x0 + dx + angle.cos().mul_add(params.radius, jitter(params.jitter, rng)),
                y0 + dir * angle.sin().mul_add(params.radius, jitter(params.jitter, rng)),
            ]);
        }
    }
    if params.noise {
        points.extend((0..params.n.div_ceil(10)).map(|_| canvas.random_point(0.0, rng)));
    }
    clamp(&mut points, canvas);
    points
}

/// Parameters of [`circles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleParams {
    /// The number of points on the rings, split evenly between them.
    pub n: usize,
    /// The radius and jitter width of the inner ring.
    pub inner: (f64, f64),
    /// The radius and jitter width of the outer ring.
    pub outer: (f64, f64),
    /// Add `n / 10` uniformly scattered points.
    pub noise: bool,
}

impl Default for CircleParams {
    /// The DBSCAN demo's rings.
    fn default() -> Self {
        Self {
            n: 100,
            inner: (50.0, 10.0),
            outer: (130.0, 15.0),
            noise: true,
        }
    }
}

impl CircleParams {
    /// The hierarchical demo's smaller rings.
    #[must_use]
    pub const fn hierarchical() -> Self {
        Self {
            n: 20,
            inner: (40.0, 10.0),
            outer: (100.0, 15.0),
            noise: false,
        }
    }
}

/// Two concentric rings around the canvas center.
pub fn circles<R: Rng>(canvas: &Canvas, params: &CircleParams, rng: &mut R) -> Vec<[f64; 2]> {
    let [cx, cy] = canvas.center();
    let half = params.n / 2;

    let mut points = Vec::with_capacity(params.n + params.n / 10 + 1);
    for (radius, width) in [params.inner, params.outer] {
        for _ in 0..half {
            let angle = rng.gen::<f64>() * 2.0 * PI;
            let r = radius + jitter(width, rng);
            points.push([angle.cos().mul_add(r, cx), angle.sin().mul_add(r, cy)]);
        }
    }
    if params.noise {
        points.extend((0..params.n.div_ceil(10)).map(|_| canvas.random_point(0.0, rng)));
    }
    clamp(&mut points, canvas);
    points
}
