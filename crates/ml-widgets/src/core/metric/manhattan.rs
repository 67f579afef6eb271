//! The `Manhattan` distance metric.

use super::{Metric, Point};

/// The `Manhattan` distance metric, the sum of absolute coordinate differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl Metric for Manhattan {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    fn name(&self) -> &str {
        "manhattan"
    }
}
