//! A kernel SVM trained by projected gradient ascent on the dual, with its
//! decision surface extracted by marching squares.
//!
//! Points live in `[-1, 1]²`. Each training step nudges a handful of randomly
//! chosen dual weights `α_i` uphill, clips them to `[0, C]`, and blends the
//! bias towards the value implied by the margin vectors.

mod kernel;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    contour::{self, Bounds, Grid, Segment, Side},
    playback::Stepper,
    Point,
};

pub use kernel::Kernel;

/// Dual weights above this are support vectors.
const SUPPORT_TOLERANCE: f64 = 1e-4;

/// A change in a dual weight above this counts as progress.
const CHANGE_TOLERANCE: f64 = 1e-5;

/// The background tint is left out where the decision value is this close to zero.
const TINT_DEAD_ZONE: f64 = 0.1;

/// The label of a training point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    /// Label `+1`.
    Positive,
    /// Label `-1`.
    Negative,
}

impl Class {
    /// The label as a number.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// Training parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvmParams {
    /// The kernel.
    pub kernel: Kernel,
    /// The upper bound on the dual weights.
    pub c: f64,
    /// The step size of the dual ascent.
    pub learning_rate: f64,
    /// The number of dual weights updated per step.
    pub samples_per_step: usize,
    /// Training stops after this many steps.
    pub max_epochs: usize,
    /// Training stops after more than this many steps in a row without
    /// progress.
    pub patience: usize,
    /// The seed for choosing which weights to update.
    pub seed: Option<u64>,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            kernel: Kernel::default(),
            c: 1.0,
            learning_rate: 0.01,
            samples_per_step: 20,
            max_epochs: 2000,
            patience: 50,
            seed: None,
        }
    }
}

impl SvmParams {
    /// Checks that the parameters are usable.
    ///
    /// # Errors
    ///
    /// If `c` or the learning rate is not positive, or the RBF `gamma` is
    /// negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.c.is_nan() || self.c <= 0.0 {
            return Err(format!("C must be positive, got {}", self.c));
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(format!("The learning rate must be positive, got {}", self.learning_rate));
        }
        if let Kernel::Rbf { gamma } = self.kernel {
            if gamma.is_nan() || gamma < 0.0 {
                return Err(format!("Gamma must be non-negative, got {gamma}"));
            }
        }
        Ok(())
    }
}

/// The decision surface sampled for drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// The number of cells along each side.
    pub resolution: usize,
    /// The decision boundary, where the decision value is 0.
    pub boundary: Vec<Segment>,
    /// The margin on the positive side, where the decision value is 1.
    pub positive_margin: Vec<Segment>,
    /// The margin on the negative side, where the decision value is -1.
    pub negative_margin: Vec<Segment>,
    /// The tint of every cell, row by row from the top.
    pub tint: Vec<Option<Side>>,
}

/// A kernel SVM.
#[derive(Debug, Clone)]
pub struct Svm {
    /// The parameters.
    params: SvmParams,
    /// The training points.
    points: Vec<Point>,
    /// The label of each training point.
    classes: Vec<Class>,
    /// The dual weight of each training point.
    alphas: Vec<f64>,
    /// The bias.
    bias: f64,
    /// The number of training steps taken.
    epoch: usize,
    /// The number of consecutive steps without progress.
    stable_steps: usize,
    /// The source of the sampled indices.
    rng: StdRng,
}

/// Builds the index sampler for a seed.
fn make_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

impl Svm {
    /// Creates an untrained SVM with no points.
    ///
    /// # Errors
    ///
    /// If the parameters are invalid.
    pub fn new(params: SvmParams) -> Result<Self, String> {
        params.validate()?;
        Ok(Self {
            params,
            points: Vec::new(),
            classes: Vec::new(),
            alphas: Vec::new(),
            bias: 0.0,
            epoch: 0,
            stable_steps: 0,
            rng: make_rng(params.seed),
        })
    }

    /// Adds a training point with a zero dual weight.
    pub fn add_point(&mut self, point: Point, class: Class) {
        self.points.push(point);
        self.classes.push(class);
        self.alphas.push(0.0);
    }

    /// Zeroes the dual weights, the bias and the epoch counter.
    pub fn reset_model(&mut self) {
        self.alphas.iter_mut().for_each(|a| *a = 0.0);
        self.bias = 0.0;
        self.epoch = 0;
        self.stable_steps = 0;
        self.rng = make_rng(self.params.seed);
    }

    /// Removes all points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.classes.clear();
        self.alphas.clear();
        self.reset_model();
    }

    /// Changes the kernel. This resets the model.
    ///
    /// # Errors
    ///
    /// If the kernel parameters are invalid, in which case the model is
    /// left unchanged.
    pub fn set_kernel(&mut self, kernel: Kernel) -> Result<(), String> {
        self.set_params(SvmParams { kernel, ..self.params })
    }

    /// Replaces the parameters. This resets the model.
    ///
    /// # Errors
    ///
    /// If the parameters are invalid.
    pub fn set_params(&mut self, params: SvmParams) -> Result<(), String> {
        params.validate()?;
        self.params = params;
        self.reset_model();
        Ok(())
    }

    /// Forgets the run of steps without progress so that a stopped training
    /// can be resumed.
    pub fn resume(&mut self) {
        self.stable_steps = 0;
    }

    /// The kernel between training points `i` and `j`.
    fn k(&self, i: usize, j: usize) -> f64 {
        self.params.kernel.eval(&self.points[i], &self.points[j])
    }

    /// `Σ_j α_j y_j K(x_j, x_i)`.
    fn weighted_kernel_sum(&self, i: usize) -> f64 {
        self.alphas
            .iter()
            .zip(&self.classes)
            .enumerate()
            .map(|(j, (a, c))| a * c.sign() * self.k(j, i))
            .sum()
    }

    /// Performs one training step and returns the number of dual weights that
    /// changed. Does nothing without points.
    pub fn train_step(&mut self) -> usize {
        if self.points.is_empty() {
            return 0;
        }

        let c = self.params.c;
        let mut changed = 0;
        for _ in 0..self.params.samples_per_step {
            let i = self.rng.gen_range(0..self.points.len());
            let y_i = self.classes[i].sign();
            let gradient = 1.0 - y_i * self.weighted_kernel_sum(i);

            let old = self.alphas[i];
            self.alphas[i] = self.params.learning_rate.mul_add(gradient, old).clamp(0.0, c);
            if (self.alphas[i] - old).abs() > CHANGE_TOLERANCE {
                changed += 1;
            }
        }

        let (sum_error, margin_count) = (0..self.points.len())
            .filter(|&i| self.alphas[i] > SUPPORT_TOLERANCE && self.alphas[i] < c - SUPPORT_TOLERANCE)
            .fold((0.0, 0_usize), |(sum, count), i| {
                (sum + self.classes[i].sign() - self.weighted_kernel_sum(i), count + 1)
            });
        if margin_count > 0 {
            let target = sum_error / crate::utils::as_f64(margin_count);
            self.bias = self.bias.mul_add(0.9, target * 0.1);
        }

        self.epoch += 1;
        if changed == 0 {
            self.stable_steps += 1;
        } else {
            self.stable_steps = 0;
        }

        ftlog::debug!(
            "Epoch {}: {changed} weights changed, {} support vectors, bias = {:.4}",
            self.epoch,
            self.support_vectors().len(),
            self.bias
        );
        if self.is_finished() {
            ftlog::info!(
                "SVM training stopped at epoch {} with {} support vectors",
                self.epoch,
                self.support_vectors().len()
            );
        }
        changed
    }

    /// Trains until finished and returns the number of steps taken.
    pub fn train(&mut self) -> usize {
        let mut steps = 0;
        while !self.is_finished() && !self.points.is_empty() {
            self.train_step();
            steps += 1;
        }
        steps
    }

    /// Whether the epoch cap was hit or progress stalled.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.epoch >= self.params.max_epochs || self.stable_steps > self.params.patience
    }

    /// The decision value at `p`: `Σ α_i y_i K(x_i, p) + b` over the support
    /// vectors.
    #[must_use]
    pub fn decision(&self, p: &Point) -> f64 {
        self.points
            .iter()
            .zip(&self.classes)
            .zip(&self.alphas)
            .filter(|(_, &a)| a > SUPPORT_TOLERANCE)
            .map(|((x, c), a)| a * c.sign() * self.params.kernel.eval(x, p))
            .sum::<f64>()
            + self.bias
    }

    /// The predicted class at `p`. A decision value of exactly 0 is positive.
    #[must_use]
    pub fn classify(&self, p: &Point) -> Class {
        if self.decision(p) >= 0.0 {
            Class::Positive
        } else {
            Class::Negative
        }
    }

    /// The fraction of training points classified correctly, or 0 without
    /// points.
    #[must_use]
    pub fn training_accuracy(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let correct = self
            .points
            .iter()
            .zip(&self.classes)
            .filter(|(p, &c)| self.classify(p) == c)
            .count();
        crate::utils::as_f64(correct) / crate::utils::as_f64(self.points.len())
    }

    /// The indices of the support vectors.
    #[must_use]
    pub fn support_vectors(&self) -> Vec<usize> {
        self.alphas
            .iter()
            .enumerate()
            .filter(|(_, &a)| a > SUPPORT_TOLERANCE)
            .map(|(i, _)| i)
            .collect()
    }

    /// The primal weight vector `w = Σ α_i y_i x_i`, for the linear kernel
    /// only.
    #[must_use]
    pub fn weights(&self) -> Option<Point> {
        if self.params.kernel != Kernel::Linear {
            return None;
        }
        let w = self
            .support_vectors()
            .into_iter()
            .map(|i| (self.alphas[i] * self.classes[i].sign(), self.points[i]))
            .fold(Point::ORIGIN, |w, (s, x)| Point::new(s.mul_add(x.x, w.x), s.mul_add(x.y, w.y)));
        Some(w)
    }

    /// Samples the decision function on a `resolution × resolution` grid over
    /// `[-1, 1]²` and extracts the boundary, the margins and the tint.
    ///
    /// # Errors
    ///
    /// If `resolution` is zero.
    pub fn surface(&self, resolution: usize) -> Result<Surface, String> {
        let grid = Grid::par_sample(Bounds::UNIT_SQUARE, resolution, resolution, |p| self.decision(&p))?;
        Ok(Surface {
            resolution,
            boundary: contour::contour(&grid, 0.0),
            positive_margin: contour::contour(&grid, 1.0),
            negative_margin: contour::contour(&grid, -1.0),
            tint: grid.tint(TINT_DEAD_ZONE),
        })
    }

    /// The parameters.
    #[must_use]
    pub const fn params(&self) -> &SvmParams {
        &self.params
    }

    /// The training points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The label of each training point.
    #[must_use]
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    /// The dual weight of each training point.
    #[must_use]
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// The bias.
    #[must_use]
    pub const fn bias(&self) -> f64 {
        self.bias
    }

    /// The number of training steps taken.
    #[must_use]
    pub const fn epoch(&self) -> usize {
        self.epoch
    }
}

impl Stepper for Svm {
    fn advance(&mut self) -> Result<(), String> {
        if self.points.is_empty() {
            return Err("Add some points before training".to_string());
        }
        self.train_step();
        Ok(())
    }

    fn is_finished(&self) -> bool {
        Self::is_finished(self)
    }
}
