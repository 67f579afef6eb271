//! Noisy one-dimensional relationships for the regression demos.

use core::f64::consts::PI;

use rand::prelude::*;

use crate::jitter;

/// `n` points with `x` uniform in `[0, 1)` and `y = 0.7x + 0.2` plus uniform
/// noise of width 0.3.
pub fn linear_trend<R: Rng>(n: usize, rng: &mut R) -> Vec<[f64; 2]> {
    (0..n)
        .map(|_| {
            let x = rng.gen::<f64>();
            [x, 0.7f64.mul_add(x, 0.2) + jitter(0.3, rng)]
        })
        .collect()
}

/// `n` points on an even grid over `[-1, 1]` with `y = 0.5 sin(πx)` plus
/// uniform noise of width `noise`.
pub fn s_curve<R: Rng>(n: usize, noise: f64, rng: &mut R) -> Vec<[f64; 2]> {
    #[allow(clippy::cast_precision_loss)]
    let steps = n.saturating_sub(1).max(1) as f64;
    (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = (i as f64 / steps).mul_add(2.0, -1.0);
            [x, 0.5f64.mul_add((x * PI).sin(), jitter(noise, rng))]
        })
        .collect()
}
