//! The `Chebyshev` distance metric.

use super::{Metric, Point};

/// The `Chebyshev` distance metric, the largest absolute coordinate difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chebyshev;

impl Metric for Chebyshev {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        (a.x - b.x).abs().max((a.y - b.y).abs())
    }

    fn name(&self) -> &str {
        "chebyshev"
    }
}
