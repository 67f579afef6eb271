//! The confusion matrix of a binary classifier and the metrics derived from it.

use serde::{Deserialize, Serialize};

use crate::utils;

/// Counts of a binary classifier's outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// True negatives.
    pub tn: usize,
    /// False positives.
    pub fp: usize,
    /// False negatives.
    pub fn_: usize,
    /// True positives.
    pub tp: usize,
}

/// `num / den`, or 0 when that is undefined.
fn ratio(num: f64, den: f64) -> f64 {
    let r = num / den;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

impl ConfusionMatrix {
    /// Tallies predictions against the truth, `true` being the positive class.
    ///
    /// # Errors
    ///
    /// If the slices have different lengths.
    pub fn from_predictions(actual: &[bool], predicted: &[bool]) -> Result<Self, String> {
        if actual.len() != predicted.len() {
            return Err(format!(
                "Got {} labels but {} predictions",
                actual.len(),
                predicted.len()
            ));
        }
        Ok(actual
            .iter()
            .zip(predicted)
            .fold(Self::default(), |mut m, (&a, &p)| {
                match (a, p) {
                    (false, false) => m.tn += 1,
                    (false, true) => m.fp += 1,
                    (true, false) => m.fn_ += 1,
                    (true, true) => m.tp += 1,
                }
                m
            }))
    }

    /// The number of outcomes.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    /// `(TP + TN) / total`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(utils::as_f64(self.tp + self.tn), utils::as_f64(self.total()))
    }

    /// `TP / (TP + FP)`.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(utils::as_f64(self.tp), utils::as_f64(self.tp + self.fp))
    }

    /// `TP / (TP + FN)`, also called sensitivity.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(utils::as_f64(self.tp), utils::as_f64(self.tp + self.fn_))
    }

    /// The harmonic mean of precision and recall.
    #[must_use]
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        ratio(2.0 * p * r, p + r)
    }

    /// The worked calculation of every metric.
    #[must_use]
    pub fn explanation(&self) -> Vec<String> {
        let Self { tn, fp, fn_, tp } = *self;
        let (p, r) = (self.precision(), self.recall());
        vec![
            format!(
                "Accuracy = (TP + TN) / Total = ({tp} + {tn}) / {} = {:.2}%",
                self.total(),
                self.accuracy() * 100.0
            ),
            format!("Precision = TP / (TP + FP) = {tp} / ({tp} + {fp}) = {:.2}%", p * 100.0),
            format!("Recall = TP / (TP + FN) = {tp} / ({tp} + {fn_}) = {:.2}%", r * 100.0),
            format!(
                "F1 = 2 * (P * R) / (P + R) = 2 * ({p:.4} * {r:.4}) / ({p:.4} + {r:.4}) = {:.2}%",
                self.f1() * 100.0
            ),
        ]
    }
}
