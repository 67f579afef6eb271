//! The `Euclidean` distance metric.

use super::{Metric, Point};

/// The `Euclidean` distance metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Metric for Euclidean {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        a.distance(b)
    }

    fn name(&self) -> &str {
        "euclidean"
    }
}
