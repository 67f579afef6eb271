//! Sampling scalar fields on a lattice and extracting their level sets with
//! marching squares.
//!
//! The grid is laid out the way a canvas is: row 0 is the top of the bounds
//! and rows grow downwards, columns grow to the right.

mod marching;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Point;

pub use marching::{cell_config, chains, contour, Chain, Edge, Segment};

/// An axis-aligned rectangle in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// The left edge.
    pub x_min: f64,
    /// The right edge.
    pub x_max: f64,
    /// The bottom edge.
    pub y_min: f64,
    /// The top edge.
    pub y_max: f64,
}

impl Bounds {
    /// Creates new `Bounds`.
    ///
    /// # Errors
    ///
    /// If either range is empty or not finite.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, String> {
        let ok = |lo: f64, hi: f64| lo.is_finite() && hi.is_finite() && lo < hi;
        if ok(x_min, x_max) && ok(y_min, y_max) {
            Ok(Self {
                x_min,
                x_max,
                y_min,
                y_max,
            })
        } else {
            Err(format!(
                "Invalid bounds: x in [{x_min}, {x_max}], y in [{y_min}, {y_max}]"
            ))
        }
    }

    /// The square `[-1, 1]²` that the SVM widget works in.
    pub const UNIT_SQUARE: Self = Self {
        x_min: -1.0,
        x_max: 1.0,
        y_min: -1.0,
        y_max: 1.0,
    };

    /// The width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// The height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Which side of the zero level a cell lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The value is positive.
    Positive,
    /// The value is negative.
    Negative,
}

/// Values of a scalar field sampled on a regular lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// The sampled region.
    bounds: Bounds,
    /// The number of cells across.
    nx: usize,
    /// The number of cells down.
    ny: usize,
    /// The `(ny + 1) × (nx + 1)` vertex values, row by row from the top.
    values: Vec<f64>,
}

impl Grid {
    /// Samples `f` at every vertex of an `nx × ny` cell lattice over `bounds`.
    ///
    /// # Errors
    ///
    /// If `nx` or `ny` is zero.
    pub fn sample<F: Fn(Point) -> f64>(bounds: Bounds, nx: usize, ny: usize, f: F) -> Result<Self, String> {
        Self::check_shape(nx, ny)?;
        let values = (0..=ny)
            .flat_map(|j| (0..=nx).map(move |i| (i, j)))
            .map(|(i, j)| f(Self::vertex_of(&bounds, nx, ny, i, j)))
            .collect();
        Ok(Self { bounds, nx, ny, values })
    }

    /// Parallel version of [`Grid::sample`](crate::contour::Grid::sample).
    ///
    /// # Errors
    ///
    /// See [`Grid::sample`](crate::contour::Grid::sample).
    pub fn par_sample<F: Fn(Point) -> f64 + Send + Sync>(
        bounds: Bounds,
        nx: usize,
        ny: usize,
        f: F,
    ) -> Result<Self, String> {
        Self::check_shape(nx, ny)?;
        let width = nx + 1;
        let values = (0..(ny + 1) * width)
            .into_par_iter()
            .map(|k| f(Self::vertex_of(&bounds, nx, ny, k % width, k / width)))
            .collect();
        Ok(Self { bounds, nx, ny, values })
    }

    /// Rejects empty lattices.
    fn check_shape(nx: usize, ny: usize) -> Result<(), String> {
        if nx == 0 || ny == 0 {
            Err(format!("A grid needs at least one cell in each direction, got {nx} x {ny}"))
        } else {
            Ok(())
        }
    }

    /// The position of vertex `(i, j)`.
    fn vertex_of(bounds: &Bounds, nx: usize, ny: usize, i: usize, j: usize) -> Point {
        let dx = bounds.width() / crate::utils::as_f64(nx);
        let dy = bounds.height() / crate::utils::as_f64(ny);
        Point::new(
            crate::utils::as_f64(i).mul_add(dx, bounds.x_min),
            crate::utils::as_f64(j).mul_add(-dy, bounds.y_max),
        )
    }

    /// The sampled region.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// The number of cells across.
    #[must_use]
    pub const fn nx(&self) -> usize {
        self.nx
    }

    /// The number of cells down.
    #[must_use]
    pub const fn ny(&self) -> usize {
        self.ny
    }

    /// The width of a cell.
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.bounds.width() / crate::utils::as_f64(self.nx)
    }

    /// The height of a cell.
    #[must_use]
    pub fn dy(&self) -> f64 {
        self.bounds.height() / crate::utils::as_f64(self.ny)
    }

    /// The value at vertex `(i, j)`: column `i`, row `j` from the top.
    ///
    /// # Panics
    ///
    /// If the vertex is outside the lattice.
    #[must_use]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[j * (self.nx + 1) + i]
    }

    /// The position of vertex `(i, j)`.
    #[must_use]
    pub fn vertex(&self, i: usize, j: usize) -> Point {
        Self::vertex_of(&self.bounds, self.nx, self.ny, i, j)
    }

    /// The smallest and largest sampled values.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// The background tint of every cell, row by row from the top.
    ///
    /// A cell takes the side of its top-left vertex, or `None` when that value
    /// is within `dead_zone` of zero.
    #[must_use]
    pub fn tint(&self, dead_zone: f64) -> Vec<Option<Side>> {
        (0..self.ny)
            .flat_map(|j| (0..self.nx).map(move |i| (i, j)))
            .map(|(i, j)| {
                let v = self.value(i, j);
                if v > dead_zone {
                    Some(Side::Positive)
                } else if v < -dead_zone {
                    Some(Side::Negative)
                } else {
                    None
                }
            })
            .collect()
    }
}
