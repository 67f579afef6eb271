//! Gradient descent on one-dimensional objectives.

use serde::{Deserialize, Serialize};

use crate::{playback::Stepper, utils, Point};

/// A position beyond this magnitude counts as divergence.
const DIVERGENCE_LIMIT: f64 = 20.0;

/// Adaptive runs stop once the gradient is smaller than this.
const GRADIENT_TOLERANCE: f64 = 1e-3;

/// Adaptive runs stop after this many iterations regardless.
const ADAPTIVE_ITERATION_CAP: usize = 500;

/// The region of the plane in which an objective is plotted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRange {
    /// The left edge.
    pub min_x: f64,
    /// The right edge.
    pub max_x: f64,
    /// The bottom edge.
    pub min_y: f64,
    /// The top edge.
    pub max_y: f64,
}

/// A function of one variable to minimize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Objective {
    /// `x²`.
    #[default]
    Quadratic,
    /// `|x|`.
    Absolute,
    /// `0.1 x⁴`.
    Quartic,
    /// `x² + 5 sin 2x`, with several local minima.
    NonConvex,
}

impl Objective {
    /// Every objective.
    pub const ALL: [Self; 4] = [Self::Quadratic, Self::Absolute, Self::Quartic, Self::NonConvex];

    /// The value at `x`.
    #[must_use]
    pub fn value(&self, x: f64) -> f64 {
        match self {
            Self::Quadratic => x * x,
            Self::Absolute => x.abs(),
            Self::Quartic => 0.1 * x.powi(4),
            Self::NonConvex => 5.0f64.mul_add((2.0 * x).sin(), x * x),
        }
    }

    /// The derivative at `x`. The kink of `|x|` has derivative 0.
    #[must_use]
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Self::Quadratic => 2.0 * x,
            Self::Absolute => utils::sign(x),
            Self::Quartic => 0.4 * x.powi(3),
            Self::NonConvex => 10.0f64.mul_add((2.0 * x).cos(), 2.0 * x),
        }
    }

    /// The function and its derivative as text.
    #[must_use]
    pub const fn formula(&self) -> (&'static str, &'static str) {
        match self {
            Self::Quadratic => ("f(x) = x^2", "f'(x) = 2x"),
            Self::Absolute => ("f(x) = |x|", "f'(x) = sign(x)"),
            Self::Quartic => ("f(x) = 0.1x^4", "f'(x) = 0.4x^3"),
            Self::NonConvex => ("f(x) = x^2 + 5sin(2x)", "f'(x) = 2x + 10cos(2x)"),
        }
    }

    /// The region in which the objective is plotted.
    #[must_use]
    pub const fn range(&self) -> PlotRange {
        let (min_y, max_y) = match self {
            Self::Quadratic => (-1.0, 30.0),
            Self::Absolute => (-1.0, 10.0),
            Self::Quartic => (-5.0, 80.0),
            Self::NonConvex => (-10.0, 40.0),
        };
        PlotRange {
            min_x: -6.0,
            max_x: 6.0,
            min_y,
            max_y,
        }
    }

    /// The curve sampled every 0.1 across the plot range.
    #[must_use]
    pub fn curve(&self) -> Vec<Point> {
        let range = self.range();
        let n = ((range.max_x - range.min_x) / 0.1).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = n as usize;
        (0..=n)
            .map(|i| {
                let x = utils::as_f64(i).mul_add(0.1, range.min_x);
                Point::new(x, self.value(x))
            })
            .collect()
    }
}

impl core::str::FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quadratic" => Ok(Self::Quadratic),
            "absolute" => Ok(Self::Absolute),
            "quartic" => Ok(Self::Quartic),
            "nonconvex" | "non-convex" => Ok(Self::NonConvex),
            _ => Err(format!("Unknown objective: {s}")),
        }
    }
}

/// When descent stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopRule {
    /// After a fixed number of iterations.
    Fixed {
        /// The number of iterations.
        max_iterations: usize,
    },
    /// When the gradient vanishes, or after 500 iterations.
    Adaptive,
}

/// Descent parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescentParams {
    /// The function to minimize.
    pub objective: Objective,
    /// The starting position.
    pub start: f64,
    /// The base step size.
    pub learning_rate: f64,
    /// Shrink the step size as `lr / (1 + 0.05 · iteration)`.
    pub decay: bool,
    /// When to stop.
    pub stop: StopRule,
}

impl Default for DescentParams {
    fn default() -> Self {
        Self {
            objective: Objective::Quadratic,
            start: -4.0,
            learning_rate: 0.1,
            decay: false,
            stop: StopRule::Fixed { max_iterations: 50 },
        }
    }
}

/// Where a descent stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// More steps to take.
    Running,
    /// The gradient vanished.
    Converged,
    /// The position left `[-20, 20]`.
    Diverged,
    /// The iteration cap was reached.
    IterationLimit,
}

/// A one-dimensional gradient descent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientDescent {
    /// The parameters.
    params: DescentParams,
    /// The current position.
    x: f64,
    /// The number of steps taken.
    iteration: usize,
    /// `(x, f(x))` from the start point onwards.
    history: Vec<Point>,
    /// Where the descent stands.
    status: Status,
}

impl GradientDescent {
    /// Places the ball at the start point.
    #[must_use]
    pub fn new(params: DescentParams) -> Self {
        let mut descent = Self {
            params,
            x: params.start,
            iteration: 0,
            history: Vec::new(),
            status: Status::Running,
        };
        descent.reset();
        descent
    }

    /// Moves back to the start point and forgets the history.
    pub fn reset(&mut self) {
        self.x = self.params.start;
        self.iteration = 0;
        self.history = vec![Point::new(self.x, self.params.objective.value(self.x))];
        self.status = Status::Running;
    }

    /// Replaces the parameters and resets.
    pub fn set_params(&mut self, params: DescentParams) {
        self.params = params;
        self.reset();
    }

    /// The step size for the next iteration.
    #[must_use]
    pub fn effective_learning_rate(&self) -> f64 {
        if self.params.decay {
            self.params.learning_rate / 0.05f64.mul_add(utils::as_f64(self.iteration), 1.0)
        } else {
            self.params.learning_rate
        }
    }

    /// Takes one step downhill and returns where the descent stands. Does
    /// nothing once it has stopped.
    pub fn step(&mut self) -> Status {
        if self.status != Status::Running {
            return self.status;
        }

        let lr = self.effective_learning_rate();
        let grad = self.params.objective.derivative(self.x);
        self.x -= lr * grad;
        self.iteration += 1;
        self.history.push(Point::new(self.x, self.value()));

        let diverged = self.is_diverged();
        self.status = match self.params.stop {
            _ if diverged => Status::Diverged,
            StopRule::Adaptive if grad.abs() < GRADIENT_TOLERANCE => Status::Converged,
            StopRule::Adaptive if self.iteration > ADAPTIVE_ITERATION_CAP => Status::IterationLimit,
            StopRule::Fixed { max_iterations } if self.iteration >= max_iterations => Status::IterationLimit,
            _ => Status::Running,
        };

        ftlog::debug!(
            "Step {}: x = {:.4}, f(x) = {:.4}, grad = {grad:.4}, lr = {lr:.4}",
            self.iteration,
            self.x,
            self.value()
        );
        if self.status != Status::Running {
            ftlog::info!("Gradient descent stopped after {} steps: {:?}", self.iteration, self.status);
        }
        self.status
    }

    /// Steps until the descent stops and returns why it stopped.
    pub fn run(&mut self) -> Status {
        while self.step() == Status::Running {}
        self.status
    }

    /// The current position.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// The objective at the current position.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.params.objective.value(self.x)
    }

    /// The derivative at the current position.
    #[must_use]
    pub fn gradient(&self) -> f64 {
        self.params.objective.derivative(self.x)
    }

    /// The number of steps taken.
    #[must_use]
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    /// `(x, f(x))` from the start point onwards.
    #[must_use]
    pub fn history(&self) -> &[Point] {
        &self.history
    }

    /// Where the descent stands.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Whether the position has left `[-20, 20]`.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        self.x.abs() > DIVERGENCE_LIMIT
    }

    /// The parameters.
    #[must_use]
    pub const fn params(&self) -> &DescentParams {
        &self.params
    }
}

impl Stepper for GradientDescent {
    fn advance(&mut self) -> Result<(), String> {
        self.step();
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.status != Status::Running
    }
}
