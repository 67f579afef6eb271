//! Subcommands for the regression and optimization widgets.

use clap::Args;
use ml_widgets::supervised::{
    gradient_descent::{DescentParams, Objective, StopRule},
    linear_regression::{least_squares, LinearParams},
    polynomial_regression::{fit, PolyParams, Regularization},
    GradientDescent, LinearRegression,
};
use planegen::trends;

use super::{make_rng, to_points};

#[derive(Args, Debug)]
pub struct LinearArgs {
    /// The number of points.
    #[arg(short('n'), long, default_value_t = 30)]
    points: usize,

    /// The step size.
    #[arg(short('l'), long, default_value_t = 0.01)]
    learning_rate: f64,

    /// The number of gradient steps.
    #[arg(short('i'), long, default_value_t = 1000)]
    iterations: usize,
}

/// Fits a line by gradient descent and compares it with least squares.
pub fn linear(args: &LinearArgs, seed: Option<u64>) -> Result<(), String> {
    let points = to_points(trends::linear_trend(args.points, &mut make_rng(seed)));
    let params = LinearParams {
        learning_rate: args.learning_rate,
        max_iterations: args.iterations,
    };
    let mut model = LinearRegression::new(points, params);
    let cost = model.train()?;

    println!(
        "After {} iterations: y = {:.4}x + {:.4}, cost {cost:.5}",
        model.iteration(),
        model.slope(),
        model.intercept()
    );
    if let Some((slope, intercept)) = least_squares(model.points()) {
        println!("Least squares:        y = {slope:.4}x + {intercept:.4}");
    }
    Ok(())
}

/// The penalties selectable on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Penalty {
    None,
    L1,
    L2,
}

#[derive(Args, Debug)]
pub struct PolyArgs {
    /// The highest power of x.
    #[arg(short('d'), long, default_value_t = 5)]
    degree: usize,

    /// The penalty on the weights.
    #[arg(short('r'), long, default_value = "none")]
    regularization: Penalty,

    /// The strength of the penalty.
    #[arg(long, default_value_t = 0.01)]
    lambda: f64,

    /// The width of the uniform noise on the S-curve.
    #[arg(long, default_value_t = 0.3)]
    noise: f64,
}

/// Fits a polynomial to a noisy S-curve.
pub fn poly(args: &PolyArgs, seed: Option<u64>) -> Result<(), String> {
    let data = to_points(trends::s_curve(25, args.noise, &mut make_rng(seed)));
    let regularization = match args.regularization {
        Penalty::None => Regularization::None,
        Penalty::L1 => Regularization::L1(args.lambda),
        Penalty::L2 => Regularization::L2(args.lambda),
    };
    let params = PolyParams {
        degree: args.degree,
        regularization,
        seed,
        ..PolyParams::default()
    };
    let model = fit(&data, &params)?;

    println!("{}", model.formula());
    println!("MSE {:.5}, weight norm {:.4}", model.mse(&data), model.weight_norm());
    Ok(())
}

#[derive(Args, Debug)]
pub struct DescentArgs {
    /// The function to minimize: quadratic, absolute, quartic or nonconvex.
    #[arg(long, default_value = "quadratic")]
    objective: Objective,

    /// The starting position.
    #[arg(long, default_value_t = -4.0, allow_hyphen_values = true)]
    start: f64,

    /// The base step size.
    #[arg(short('l'), long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Shrink the step size over time.
    #[arg(long, default_value_t = false)]
    decay: bool,

    /// Stop when the gradient vanishes instead of after a fixed count.
    #[arg(long, default_value_t = false)]
    adaptive: bool,

    /// The iteration count for the fixed stopping rule.
    #[arg(short('i'), long, default_value_t = 50)]
    max_iterations: usize,
}

/// Runs the descent and prints its path.
pub fn descent(args: &DescentArgs) -> Result<(), String> {
    let stop = if args.adaptive {
        StopRule::Adaptive
    } else {
        StopRule::Fixed {
            max_iterations: args.max_iterations,
        }
    };
    let params = DescentParams {
        objective: args.objective,
        start: args.start,
        learning_rate: args.learning_rate,
        decay: args.decay,
        stop,
    };
    let mut model = GradientDescent::new(params);
    let status = model.run();

    let (formula, derivative) = args.objective.formula();
    println!("{formula}, {derivative}");
    for (i, p) in model.history().iter().enumerate() {
        println!("{i:>4}: x = {:>10.5}, f(x) = {:>10.5}", p.x, p.y);
    }
    println!("{status:?} after {} iterations at x = {:.5}", model.iteration(), model.x());
    Ok(())
}
