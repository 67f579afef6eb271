//! Kernel functions.

use serde::{Deserialize, Serialize};

use crate::Point;

/// A kernel, i.e. an inner product in some feature space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Kernel {
    /// `⟨u, v⟩`.
    Linear,
    /// `(⟨u, v⟩ + 1)^degree`.
    Polynomial {
        /// The degree.
        degree: u32,
    },
    /// `exp(-γ ‖u - v‖²)`.
    Rbf {
        /// The width parameter.
        gamma: f64,
    },
}

impl Default for Kernel {
    fn default() -> Self {
        Self::Rbf { gamma: 0.5 }
    }
}

impl Kernel {
    /// Evaluates the kernel.
    #[must_use]
    pub fn eval(&self, u: &Point, v: &Point) -> f64 {
        match *self {
            Self::Linear => u.dot(v),
            Self::Polynomial { degree } => (u.dot(v) + 1.0).powf(f64::from(degree)),
            Self::Rbf { gamma } => (-gamma * u.distance_sq(v)).exp(),
        }
    }

    /// The short name of the kernel.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Polynomial { .. } => "poly",
            Self::Rbf { .. } => "rbf",
        }
    }
}

impl core::fmt::Display for Kernel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Polynomial { degree } => write!(f, "poly(degree = {degree})"),
            Self::Rbf { gamma } => write!(f, "rbf(gamma = {gamma})"),
        }
    }
}
