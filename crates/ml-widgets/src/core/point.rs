//! A point in the plane.

use serde::{Deserialize, Serialize};

/// A point in the plane.
///
/// All widgets work in two dimensions. Any per-algorithm tags (cluster ids,
/// class labels, visited flags) are kept by the owning engine in vectors
/// parallel to its points, so a `Point` is always just its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// The horizontal coordinate.
    pub x: f64,
    /// The vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new `Point`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Returns the dot product with another point, treating both as vectors.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Returns the squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        dx.mul_add(dx, dy * dy)
    }

    /// Returns the Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Returns the mean of the given points, or `None` if there are none.
    #[must_use]
    pub fn mean<'a, I: IntoIterator<Item = &'a Self>>(points: I) -> Option<Self> {
        let (count, sum_x, sum_y) = points
            .into_iter()
            .fold((0_usize, 0.0, 0.0), |(c, sx, sy), p| (c + 1, sx + p.x, sy + p.y));
        if count == 0 {
            None
        } else {
            let n = crate::utils::as_f64(count);
            Some(Self::new(sum_x / n, sum_y / n))
        }
    }

    /// Linearly interpolates between `self` (at `t = 0`) and `other` (at `t = 1`).
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(t.mul_add(other.x - self.x, self.x), t.mul_add(other.y - self.y, self.y))
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl core::fmt::Display for Point {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.0}, {:.0})", self.x, self.y)
    }
}

/// Returns the display label of the point at the given index, e.g. `P1` for
/// index 0.
#[must_use]
pub fn label(index: usize) -> String {
    format!("P{}", index + 1)
}
