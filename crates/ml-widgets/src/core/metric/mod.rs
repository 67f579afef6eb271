//! The `Metric` trait is used for all distance computations between points.

use super::Point;

mod chebyshev;
mod euclidean;
mod macros;
mod manhattan;

pub use chebyshev::Chebyshev;
pub use euclidean::Euclidean;
pub use manhattan::Manhattan;

/// The `Metric` trait is used for all distance computations between points.
///
/// DBSCAN, agglomerative clustering and k-NN are generic over it. k-means is
/// not, since its update step (the arithmetic mean) only minimizes squared
/// Euclidean distance.
///
/// # Example
///
/// ```rust
/// use ml_widgets::{Metric, Point};
///
/// /// Distance along the horizontal axis only.
/// struct Horizontal;
///
/// impl Metric for Horizontal {
///     fn distance(&self, a: &Point, b: &Point) -> f64 {
///         (a.x - b.x).abs()
///     }
///
///     fn name(&self) -> &str {
///         "horizontal"
///     }
/// }
///
/// let a = Point::new(1.0, 5.0);
/// let b = Point::new(4.0, -2.0);
/// assert_eq!(Horizontal.distance(&a, &b), 3.0);
/// ```
pub trait Metric {
    /// Call the metric on two points.
    fn distance(&self, a: &Point, b: &Point) -> f64;

    /// The name of the metric.
    fn name(&self) -> &str;
}

impl<M: Metric + ?Sized> Metric for Box<M> {
    macros::impl_metric_block!();
}

impl<M: Metric + ?Sized> Metric for &M {
    macros::impl_metric_block!();
}
