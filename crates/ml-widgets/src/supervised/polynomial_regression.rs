//! Polynomial regression with optional L1 or L2 regularization, fit by
//! gradient descent so learners can see how the penalty shrinks the weights.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{utils, Point};

/// The penalty added to the squared error. The bias is never penalized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Regularization {
    /// No penalty.
    #[default]
    None,
    /// Lasso, `λ Σ|w|`.
    L1(f64),
    /// Ridge, `λ Σw² / 2`.
    L2(f64),
}

impl Regularization {
    /// The gradient of the penalty with respect to a non-bias weight.
    fn gradient(&self, w: f64) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::L1(lambda) => lambda * utils::sign(w),
            Self::L2(lambda) => lambda * w,
        }
    }
}

/// Fitting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolyParams {
    /// The highest power of `x`.
    pub degree: usize,
    /// The penalty.
    pub regularization: Regularization,
    /// The step size.
    pub learning_rate: f64,
    /// The number of gradient steps.
    pub iterations: usize,
    /// The seed for the initial weights.
    pub seed: Option<u64>,
}

impl Default for PolyParams {
    fn default() -> Self {
        Self {
            degree: 1,
            regularization: Regularization::None,
            learning_rate: 0.1,
            iterations: 5000,
            seed: None,
        }
    }
}

/// A fitted polynomial `Σ w_d x^d`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyModel {
    /// The weights, bias first.
    pub weights: Vec<f64>,
    /// The penalty the model was fit with.
    pub regularization: Regularization,
}

/// Returns `[1, x, x², …, x^degree]`.
fn features(x: f64, degree: usize) -> Vec<f64> {
    core::iter::successors(Some(1.0), |&p| Some(p * x))
        .take(degree + 1)
        .collect()
}

/// Fits a polynomial to `data` by full-batch gradient descent.
///
/// The weights start uniformly in `[-0.05, 0.05)`.
///
/// # Errors
///
/// If `data` is empty.
pub fn fit(data: &[Point], params: &PolyParams) -> Result<PolyModel, String> {
    if data.is_empty() {
        return Err("There is no data to fit".to_string());
    }

    let mut rng = params.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let mut weights = (0..=params.degree)
        .map(|_| (rng.gen::<f64>() - 0.5) * 0.1)
        .collect::<Vec<_>>();

    let rows = data.iter().map(|p| features(p.x, params.degree)).collect::<Vec<_>>();
    let n = utils::as_f64(data.len());

    for iter in 0..params.iterations {
        let mut gradients = vec![0.0; weights.len()];
        for (row, p) in rows.iter().zip(data) {
            let prediction = row.iter().zip(&weights).map(|(x, w)| x * w).sum::<f64>();
            let err = prediction - p.y;
            for (g, x) in gradients.iter_mut().zip(row) {
                *g += err * x / n;
            }
        }

        for (d, (w, g)) in weights.iter_mut().zip(gradients).enumerate() {
            let penalty = if d == 0 { 0.0 } else { params.regularization.gradient(*w) };
            *w -= params.learning_rate * (g + penalty);
        }

        if iter % 1000 == 0 {
            ftlog::trace!("Polynomial fit iteration {iter}: weights {weights:?}");
        }
    }

    let model = PolyModel {
        weights,
        regularization: params.regularization,
    };
    ftlog::debug!(
        "Fit degree {} polynomial with MSE {:.6}",
        params.degree,
        model.mse(data)
    );
    Ok(model)
}

impl PolyModel {
    /// The degree of the polynomial.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.weights.len().saturating_sub(1)
    }

    /// The value of the polynomial at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.weights.iter().rev().fold(0.0, |acc, &w| acc.mul_add(x, w))
    }

    /// The mean squared error on `data`, or 0 for no data.
    #[must_use]
    pub fn mse(&self, data: &[Point]) -> f64 {
        let errors = data
            .iter()
            .map(|p| {
                let e = self.predict(p.x) - p.y;
                e * e
            })
            .collect::<Vec<_>>();
        utils::mean(&errors)
    }

    /// The norm of the non-bias weights: `Σ|w|` under L1, otherwise `√Σw²`.
    #[must_use]
    pub fn weight_norm(&self) -> f64 {
        let rest = self.weights.iter().skip(1);
        match self.regularization {
            Regularization::L1(_) => rest.map(|w| w.abs()).sum(),
            _ => rest.map(|w| w * w).sum::<f64>().sqrt(),
        }
    }

    /// The polynomial as text, e.g. `y = 0.012 + 1.503x - 0.210x^3`.
    ///
    /// Terms whose weight is below 0.001 in magnitude are left out.
    #[must_use]
    pub fn formula(&self) -> String {
        let mut formula = String::from("y =");
        let mut first = true;
        for (d, &w) in self.weights.iter().enumerate() {
            if w.abs() < 0.001 {
                continue;
            }
            let sign = match (first, w < 0.0) {
                (true, false) => " ",
                (true, true) => " -",
                (false, false) => " + ",
                (false, true) => " - ",
            };
            let term = match d {
                0 => String::new(),
                1 => "x".to_string(),
                _ => format!("x^{d}"),
            };
            formula.push_str(&format!("{sign}{:.3}{term}", w.abs()));
            first = false;
        }
        if first {
            formula.push_str(" 0");
        }
        formula
    }

    /// Samples the curve at `n` evenly spaced x-values in `[lo, hi]`.
    #[must_use]
    pub fn curve(&self, lo: f64, hi: f64, n: usize) -> Vec<Point> {
        let steps = utils::as_f64(n.saturating_sub(1).max(1));
        (0..n)
            .map(|i| {
                let x = (hi - lo).mul_add(utils::as_f64(i) / steps, lo);
                Point::new(x, self.predict(x))
            })
            .collect()
    }
}
