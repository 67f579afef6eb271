//! Residual error metrics of a line against a handful of points.

use serde::{Deserialize, Serialize};

use crate::{utils, Point};

/// Percentage errors are only defined where `|y|` exceeds this.
const ZERO_TOLERANCE: f64 = 1e-9;

/// A line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// The slope.
    pub slope: f64,
    /// The intercept.
    pub intercept: f64,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            slope: 0.3,
            intercept: 2.5,
        }
    }
}

impl Line {
    /// The value of the line at `x`.
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// The points the playground starts with.
#[must_use]
pub fn default_points() -> Vec<Point> {
    vec![Point::new(1.0, 2.5), Point::new(3.0, 3.8), Point::new(5.0, 4.1)]
}

/// The residual of one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Residual {
    /// The point.
    pub point: Point,
    /// The value of the line at the point's x.
    pub y_line: f64,
    /// `y - y_line`.
    pub error: f64,
    /// `|error|`.
    pub abs_error: f64,
    /// `error²`.
    pub sq_error: f64,
    /// `|error| / |y|`, when `y` is not zero.
    pub percent_error: Option<f64>,
}

/// The residuals and the metrics built from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// The residual of every point.
    pub rows: Vec<Residual>,
    /// `Σ|Δ|`.
    pub sum_abs: f64,
    /// `ΣΔ²`.
    pub sum_sq: f64,
    /// The mean absolute error.
    pub mae: f64,
    /// The mean squared error.
    pub mse: f64,
    /// The root mean squared error.
    pub rmse: f64,
    /// The mean absolute percentage error, in percent, when every point has a
    /// percentage error.
    pub mape: Option<f64>,
}

/// Computes the residuals of `points` against `line`.
///
/// # Errors
///
/// If there are no points.
pub fn evaluate(points: &[Point], line: &Line) -> Result<ErrorReport, String> {
    if points.is_empty() {
        return Err("At least one point is needed".to_string());
    }

    let rows = points
        .iter()
        .map(|&point| {
            let y_line = line.at(point.x);
            let error = point.y - y_line;
            let abs_error = error.abs();
            Residual {
                point,
                y_line,
                error,
                abs_error,
                sq_error: error * error,
                percent_error: (point.y.abs() > ZERO_TOLERANCE).then(|| abs_error / point.y.abs()),
            }
        })
        .collect::<Vec<_>>();

    let n = utils::as_f64(rows.len());
    let sum_abs = rows.iter().map(|r| r.abs_error).sum::<f64>();
    let sum_sq = rows.iter().map(|r| r.sq_error).sum::<f64>();
    let mse = sum_sq / n;
    let mape = rows
        .iter()
        .map(|r| r.percent_error)
        .sum::<Option<f64>>()
        .map(|s| 100.0 * s / n);

    Ok(ErrorReport {
        rows,
        sum_abs,
        sum_sq,
        mae: sum_abs / n,
        mse,
        rmse: mse.sqrt(),
        mape,
    })
}

/// Samples `line` at `n` evenly spaced x-values spanning the points' x-range
/// padded by `max(1.5, 0.2 · span)` on each side.
///
/// Returns nothing when there are no points.
#[must_use]
pub fn line_samples(points: &[Point], line: &Line, n: usize) -> Vec<Point> {
    let Some((min_x, max_x)) = points.iter().map(|p| p.x).fold(None, |acc, x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((f64::min(lo, x), f64::max(hi, x))),
    }) else {
        return Vec::new();
    };

    let span = if max_x > min_x { max_x - min_x } else { 1.0 };
    let padding = (0.2 * span).max(1.5);
    let (lo, hi) = (min_x - padding, max_x + padding);
    let steps = utils::as_f64(n.saturating_sub(1).max(1));

    (0..n)
        .map(|i| {
            let x = (hi - lo).mul_add(utils::as_f64(i) / steps, lo);
            Point::new(x, line.at(x))
        })
        .collect()
}
