//! Labelled toy problems for the classification demos.

use rand::prelude::*;

use crate::{jitter, Canvas};

/// Two classes of `per_class` points each: class 0 in the lower left and
/// class 1 in the upper right of the canvas.
///
/// Returns the points and their classes.
pub fn two_corners<R: Rng>(canvas: &Canvas, per_class: usize, rng: &mut R) -> (Vec<[f64; 2]>, Vec<usize>) {
    let (w, h) = (canvas.width, canvas.height);
    let regions = [(0, [0.2, 0.65]), (1, [0.6, 0.1])];

    let mut points = Vec::with_capacity(2 * per_class);
    let mut classes = Vec::with_capacity(2 * per_class);
    for (class, [fx, fy]) in regions {
        for _ in 0..per_class {
            points.push([
                w * rng.gen::<f64>().mul_add(0.2, fx),
                h * rng.gen::<f64>().mul_add(0.25, fy),
            ]);
            classes.push(class);
        }
    }
    (points, classes)
}

/// A uniformly random point in `[-0.9, 0.9)²`.
fn in_box<R: Rng>(rng: &mut R) -> [f64; 2] {
    [jitter(1.8, rng), jitter(1.8, rng)]
}

/// Two linearly separable squares around `(0.4, 0.4)` (label `+1`) and
/// `(-0.4, -0.4)` (label `-1`), interleaved.
pub fn separable_squares<R: Rng>(per_class: usize, rng: &mut R) -> (Vec<[f64; 2]>, Vec<i8>) {
    (0..per_class)
        .flat_map(|_| {
            let pos = [0.4 + jitter(0.4, rng), 0.4 + jitter(0.4, rng)];
            let neg = [-0.4 + jitter(0.4, rng), -0.4 + jitter(0.4, rng)];
            [(pos, 1), (neg, -1)]
        })
        .unzip()
}

/// Points split by the parabola `y = x² - 0.3`: below it is `-1`.
pub fn parabola_split<R: Rng>(n: usize, rng: &mut R) -> (Vec<[f64; 2]>, Vec<i8>) {
    (0..n)
        .map(|_| {
            let [x, y] = in_box(rng);
            let label = if y < x.mul_add(x, -0.3) { -1 } else { 1 };
            ([x, y], label)
        })
        .unzip()
}

/// Points inside the disc of radius 0.5 are `+1`, the rest `-1`.
pub fn centered_disc<R: Rng>(n: usize, rng: &mut R) -> (Vec<[f64; 2]>, Vec<i8>) {
    (0..n)
        .map(|_| {
            let [x, y] = in_box(rng);
            let label = if x.hypot(y) > 0.5 { -1 } else { 1 };
            ([x, y], label)
        })
        .unzip()
}
