//! Utility functions for the crate.

/// Return the mean value of the given slice of values, or zero for an empty
/// slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / as_f64(values.len())
    }
}

/// Calculate the mean and (population) variance of the given values in a
/// single pass.
///
/// # Returns
///
/// A tuple containing the mean and variance of the given values, both zero
/// for an empty slice.
#[must_use]
pub fn mean_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = as_f64(values.len());
    let (sum, sum_squares) = values
        .iter()
        .fold((0.0, 0.0), |(sum, sum_squares), &x| (sum + x, x.mul_add(x, sum_squares)));

    let mean = sum / n;
    let variance = mean.mul_add(-mean, sum_squares / n).max(0.0);

    (mean, variance)
}

/// Converts a count to `f64`.
///
/// The widgets never hold anywhere near 2^52 items, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn as_f64(n: usize) -> f64 {
    n as f64
}

/// Returns `-1`, `0` or `1` according to the sign of `x`.
///
/// Unlike [`f64::signum`], zero maps to zero, which is what the subgradients of
/// `|x|` and of the L1 penalty need.
#[must_use]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
