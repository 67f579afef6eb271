#![deny(clippy::correctness)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic,
    clippy::nursery,
    clippy::missing_docs_in_private_items
)]
#![doc = include_str!("../README.md")]

pub mod clusters;
pub mod labelled;
pub mod trends;

use rand::prelude::*;

/// The version of the crate.
pub const VERSION: &str = "0.1.0";

/// The drawing area that point coordinates live in, with the origin at the
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// The width.
    pub width: f64,
    /// The height.
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
        }
    }
}

impl Canvas {
    /// The distance from the edges that [`clamp`] keeps points away from.
    pub const MARGIN: f64 = 20.0;

    /// The center.
    #[must_use]
    pub fn center(&self) -> [f64; 2] {
        [self.width / 2.0, self.height / 2.0]
    }

    /// A uniformly random point within `padding` of the edges.
    pub fn random_point<R: Rng>(&self, padding: f64, rng: &mut R) -> [f64; 2] {
        [
            rng.gen::<f64>().mul_add(2.0f64.mul_add(-padding, self.width), padding),
            rng.gen::<f64>().mul_add(2.0f64.mul_add(-padding, self.height), padding),
        ]
    }
}

/// Uniform noise in `[-width / 2, width / 2)`.
pub fn jitter<R: Rng>(width: f64, rng: &mut R) -> f64 {
    (rng.gen::<f64>() - 0.5) * width
}

/// Moves every point to within [`Canvas::MARGIN`] of the canvas edges.
pub fn clamp(points: &mut [[f64; 2]], canvas: &Canvas) {
    for [x, y] in points.iter_mut() {
        *x = x.clamp(Canvas::MARGIN, canvas.width - Canvas::MARGIN);
        *y = y.clamp(Canvas::MARGIN, canvas.height - Canvas::MARGIN);
    }
}

/// `n` points uniformly distributed over the whole canvas.
#[must_use]
pub fn uniform<R: Rng>(canvas: &Canvas, n: usize, rng: &mut R) -> Vec<[f64; 2]> {
    (0..n).map(|_| canvas.random_point(0.0, rng)).collect()
}
