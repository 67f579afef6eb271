//! k-fold cross-validation.

use core::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{playback::Stepper, utils};

/// One split of the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// The position of the fold, from 0.
    pub index: usize,
    /// The contiguous block of indices held out for validation.
    pub valid: Range<usize>,
    /// The remaining indices, in order.
    pub train: Vec<usize>,
}

/// Splits `n` items into `k` contiguous blocks whose sizes differ by at most
/// one, larger blocks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KFold {
    /// The number of folds.
    k: usize,
    /// The number of items.
    n: usize,
}

impl KFold {
    /// Creates a new `KFold`.
    ///
    /// # Errors
    ///
    /// Unless `2 <= k <= n`.
    pub fn new(k: usize, n: usize) -> Result<Self, String> {
        if k < 2 {
            Err(format!("At least 2 folds are needed, got {k}"))
        } else if k > n {
            Err(format!("Cannot split {n} items into {k} folds"))
        } else {
            Ok(Self { k, n })
        }
    }

    /// The number of folds.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// The number of items.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// The validation block of fold `i`.
    fn block(&self, i: usize) -> Range<usize> {
        let (size, extra) = (self.n / self.k, self.n % self.k);
        let start = i * size + i.min(extra);
        let len = size + usize::from(i < extra);
        start..start + len
    }

    /// The folds in order.
    #[must_use]
    pub fn folds(&self) -> Vec<Fold> {
        (0..self.k)
            .map(|index| {
                let valid = self.block(index);
                let train = (0..valid.start).chain(valid.end..self.n).collect();
                Fold { index, valid, train }
            })
            .collect()
    }
}

/// The scores of every fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvReport {
    /// The score of each fold.
    pub scores: Vec<f64>,
    /// The mean score.
    pub mean: f64,
    /// The population standard deviation of the scores.
    pub std: f64,
}

impl CvReport {
    /// Summarizes fold scores.
    #[must_use]
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let (mean, variance) = utils::mean_variance(&scores);
        Self {
            scores,
            mean,
            std: variance.sqrt(),
        }
    }

    /// The mean of the first `upto` scores, 0 for none.
    #[must_use]
    pub fn running_mean(&self, upto: usize) -> f64 {
        utils::mean(&self.scores[..upto.min(self.scores.len())])
    }
}

/// Scores every fold with `score(train, valid)`.
///
/// # Errors
///
/// Whatever `score` returns.
pub fn cross_validate<F>(kfold: &KFold, mut score: F) -> Result<CvReport, String>
where
    F: FnMut(&[usize], &[usize]) -> Result<f64, String>,
{
    let scores = kfold
        .folds()
        .into_iter()
        .map(|fold| {
            let valid = fold.valid.clone().collect::<Vec<_>>();
            let s = score(&fold.train, &valid)?;
            ftlog::debug!("Fold {}: score {s:.4}", fold.index + 1);
            Ok(s)
        })
        .collect::<Result<Vec<_>, String>>()?;
    let report = CvReport::from_scores(scores);
    ftlog::info!("{}-fold cross-validation: {:.4} ± {:.4}", kfold.k(), report.mean, report.std);
    Ok(report)
}

/// Reveals the folds of a report one per frame, with the running mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldReveal {
    /// The report being revealed.
    report: CvReport,
    /// The number of folds shown.
    shown: usize,
}

impl FoldReveal {
    /// Starts with no folds shown.
    #[must_use]
    pub const fn new(report: CvReport) -> Self {
        Self { report, shown: 0 }
    }

    /// The fold being highlighted.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.shown.checked_sub(1)
    }

    /// The scores shown so far.
    #[must_use]
    pub fn visible_scores(&self) -> &[f64] {
        &self.report.scores[..self.shown]
    }

    /// The mean of the scores shown so far.
    #[must_use]
    pub fn running_mean(&self) -> f64 {
        self.report.running_mean(self.shown)
    }
}

impl Stepper for FoldReveal {
    fn advance(&mut self) -> Result<(), String> {
        if self.shown < self.report.scores.len() {
            self.shown += 1;
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.shown >= self.report.scores.len()
    }
}
