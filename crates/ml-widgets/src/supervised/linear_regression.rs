//! Simple linear regression fit by batch gradient descent.

use serde::{Deserialize, Serialize};

use crate::{playback::Stepper, utils, Point};

/// Training parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    /// The step size.
    pub learning_rate: f64,
    /// The number of iterations after which training stops.
    pub max_iterations: usize,
}

impl Default for LinearParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            max_iterations: 1000,
        }
    }
}

/// A line `y = slope * x + intercept` trained one gradient step at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// The training data.
    points: Vec<Point>,
    /// The parameters.
    params: LinearParams,
    /// The slope.
    slope: f64,
    /// The intercept.
    intercept: f64,
    /// The number of steps taken.
    iteration: usize,
}

impl LinearRegression {
    /// Creates an untrained model, with slope and intercept at zero.
    #[must_use]
    pub const fn new(points: Vec<Point>, params: LinearParams) -> Self {
        Self {
            points,
            params,
            slope: 0.0,
            intercept: 0.0,
            iteration: 0,
        }
    }

    /// Replaces the training data and resets the model.
    pub fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        self.reset();
    }

    /// Replaces the parameters. The model is kept.
    pub fn set_params(&mut self, params: LinearParams) {
        self.params = params;
    }

    /// Zeroes the model.
    pub fn reset(&mut self) {
        self.slope = 0.0;
        self.intercept = 0.0;
        self.iteration = 0;
    }

    /// Takes one gradient step on the mean squared error. Does nothing once
    /// `max_iterations` steps have been taken.
    ///
    /// # Errors
    ///
    /// If there is no training data.
    pub fn step(&mut self) -> Result<(), String> {
        if self.points.is_empty() {
            return Err("There is no training data".to_string());
        }
        if self.is_finished() {
            return Ok(());
        }

        let (slope_grad, intercept_grad) = self.points.iter().fold((0.0, 0.0), |(gm, gb), p| {
            let err = self.predict(p.x) - p.y;
            (err.mul_add(p.x, gm), gb + err)
        });
        let n = utils::as_f64(self.points.len());
        self.slope -= self.params.learning_rate * slope_grad / n;
        self.intercept -= self.params.learning_rate * intercept_grad / n;
        self.iteration += 1;

        ftlog::trace!(
            "Iteration {}: slope = {:.4}, intercept = {:.4}",
            self.iteration,
            self.slope,
            self.intercept
        );
        if self.is_finished() {
            ftlog::info!("Linear regression finished with cost {:.6}", self.cost());
        }
        Ok(())
    }

    /// Steps until `max_iterations` and returns the final cost.
    ///
    /// # Errors
    ///
    /// If there is no training data.
    pub fn train(&mut self) -> Result<f64, String> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(self.cost())
    }

    /// Whether `max_iterations` steps have been taken.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.iteration >= self.params.max_iterations
    }

    /// The model's prediction at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }

    /// Half the mean squared error, `Σ err² / 2n`, or 0 without data.
    #[must_use]
    pub fn cost(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let sum = self
            .points
            .iter()
            .map(|p| self.predict(p.x) - p.y)
            .map(|e| e * e)
            .sum::<f64>();
        sum / (2.0 * utils::as_f64(self.points.len()))
    }

    /// The slope.
    #[must_use]
    pub const fn slope(&self) -> f64 {
        self.slope
    }

    /// The intercept.
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// The number of steps taken.
    #[must_use]
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    /// The training data.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Stepper for LinearRegression {
    fn advance(&mut self) -> Result<(), String> {
        self.step()
    }

    fn is_finished(&self) -> bool {
        Self::is_finished(self)
    }
}

/// The closed-form least-squares line through `points`, as
/// `(slope, intercept)`.
///
/// Returns `None` when there are fewer than two distinct x-values.
#[must_use]
pub fn least_squares(points: &[Point]) -> Option<(f64, f64)> {
    let xs = points.iter().map(|p| p.x).collect::<Vec<_>>();
    let ys = points.iter().map(|p| p.y).collect::<Vec<_>>();
    let (mean_x, var_x) = utils::mean_variance(&xs);
    if var_x <= f64::EPSILON {
        return None;
    }
    let mean_y = utils::mean(&ys);
    let cov = points
        .iter()
        .map(|p| (p.x - mean_x) * (p.y - mean_y))
        .sum::<f64>()
        / utils::as_f64(points.len());
    let slope = cov / var_x;
    Some((slope, slope.mul_add(-mean_x, mean_y)))
}
