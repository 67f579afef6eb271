//! The binormal model of a scoring classifier: negative and positive scores
//! are normal with a shared spread, and a threshold splits them.

use serde::{Deserialize, Serialize};

use super::ConfusionMatrix;
use crate::utils;

/// The number of trapezoids in [`normal_cdf`].
const CDF_PANELS: usize = 100;

/// The normal density.
#[must_use]
pub fn normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    let z = (x - mean) / std;
    (-0.5 * z * z).exp() / (std * (2.0 * core::f64::consts::PI).sqrt())
}

/// The normal CDF by the trapezoidal rule over 100 panels starting five
/// standard deviations below the mean.
///
/// Returns 0 below the start of the integration and never more than 1.
#[must_use]
pub fn normal_cdf(x: f64, mean: f64, std: f64) -> f64 {
    let start = 5.0f64.mul_add(-std, mean);
    if x < start {
        return 0.0;
    }
    let dx = (x - start) / utils::as_f64(CDF_PANELS);
    let sum = (0..CDF_PANELS)
        .map(|i| {
            let x1 = utils::as_f64(i).mul_add(dx, start);
            let x2 = utils::as_f64(i + 1).mul_add(dx, start);
            (normal_pdf(x1, mean, std) + normal_pdf(x2, mean, std)) * dx / 2.0
        })
        .sum::<f64>();
    sum.min(1.0)
}

/// The normal CDF in closed form.
#[must_use]
pub fn exact_normal_cdf(x: f64, mean: f64, std: f64) -> f64 {
    0.5 * (1.0 + libm::erf((x - mean) / (std * core::f64::consts::SQRT_2)))
}

/// A point on the ROC curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    /// The threshold that produced the point.
    pub threshold: f64,
    /// The false positive rate.
    pub fpr: f64,
    /// The true positive rate.
    pub tpr: f64,
}

/// A sampled ROC curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    /// The points from the highest threshold to the lowest.
    pub points: Vec<RocPoint>,
    /// The trapezoidal area under the curve, closed at `(0, 0)` and `(1, 1)`.
    pub auc: f64,
}

/// Two normal score distributions with a common standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binormal {
    /// The mean score of negatives.
    pub mean_neg: f64,
    /// The mean score of positives.
    pub mean_pos: f64,
    /// The shared standard deviation.
    pub std: f64,
}

impl Default for Binormal {
    fn default() -> Self {
        Self {
            mean_neg: 0.0,
            mean_pos: 2.0,
            std: 1.0,
        }
    }
}

impl Binormal {
    /// The highest threshold of the sweep.
    pub const SWEEP_HIGH: f64 = 8.0;

    /// The lowest threshold of the sweep.
    pub const SWEEP_LOW: f64 = -4.0;

    /// Creates a new `Binormal`.
    ///
    /// # Errors
    ///
    /// If `std` is not positive.
    pub fn new(mean_neg: f64, mean_pos: f64, std: f64) -> Result<Self, String> {
        if std.is_nan() || std <= 0.0 {
            return Err(format!("The standard deviation must be positive, got {std}"));
        }
        Ok(Self { mean_neg, mean_pos, std })
    }

    /// The false and true positive rates when scores at or above `threshold`
    /// are called positive.
    #[must_use]
    pub fn rates(&self, threshold: f64) -> (f64, f64) {
        (
            1.0 - normal_cdf(threshold, self.mean_neg, self.std),
            1.0 - normal_cdf(threshold, self.mean_pos, self.std),
        )
    }

    /// Sweeps the threshold from 8 down to -4 in steps of `step`.
    ///
    /// # Errors
    ///
    /// If `step` is not positive.
    pub fn roc_curve(&self, step: f64) -> Result<RocCurve, String> {
        if step.is_nan() || step <= 0.0 {
            return Err(format!("The threshold step must be positive, got {step}"));
        }
        let n = ((Self::SWEEP_HIGH - Self::SWEEP_LOW) / step).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = n as usize;

        let points = (0..=n)
            .map(|i| {
                let threshold = utils::as_f64(i).mul_add(-step, Self::SWEEP_HIGH);
                let (fpr, tpr) = self.rates(threshold);
                RocPoint { threshold, fpr, tpr }
            })
            .collect::<Vec<_>>();

        let corners = [(0.0, 0.0), (1.0, 1.0)];
        let path = core::iter::once(corners[0])
            .chain(points.iter().map(|p| (p.fpr, p.tpr)))
            .chain(core::iter::once(corners[1]))
            .collect::<Vec<_>>();
        let auc = path
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum();

        ftlog::debug!("ROC sweep over {} thresholds, AUC = {auc:.4}", points.len());
        Ok(RocCurve { points, auc })
    }

    /// The exact AUC, `Φ((μ⁺ - μ⁻) / (σ√2))`.
    #[must_use]
    pub fn analytic_auc(&self) -> f64 {
        exact_normal_cdf((self.mean_pos - self.mean_neg) / (self.std * core::f64::consts::SQRT_2), 0.0, 1.0)
    }

    /// The expected confusion matrix at `threshold` for a population split
    /// evenly between the classes. Each cell is rounded on its own.
    #[must_use]
    pub fn confusion(&self, threshold: f64, population: usize) -> ConfusionMatrix {
        let half = utils::as_f64(population) / 2.0;
        let (fpr, tpr) = self.rates(threshold);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = |p: f64| (p * half).round().max(0.0) as usize;
        ConfusionMatrix {
            tn: count(1.0 - fpr),
            fp: count(fpr),
            fn_: count(1.0 - tpr),
            tp: count(tpr),
        }
    }

    /// Both densities sampled every 0.1 over the plotted score range.
    #[must_use]
    pub fn densities(&self) -> Vec<(f64, f64, f64)> {
        (0..=120)
            .map(|i| {
                let x = f64::from(i).mul_add(0.1, Self::SWEEP_LOW);
                (
                    x,
                    normal_pdf(x, self.mean_neg, self.std),
                    normal_pdf(x, self.mean_pos, self.std),
                )
            })
            .collect()
    }
}
