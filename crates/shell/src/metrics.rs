//! Metrics selectable on the command line.

use ml_widgets::metric::{Chebyshev, Euclidean, Manhattan};

/// The distance functions available to the clustering and k-NN commands.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Metric {
    #[clap(name = "euclidean")]
    Euclidean,
    #[clap(name = "manhattan")]
    Manhattan,
    #[clap(name = "chebyshev")]
    Chebyshev,
}

/// A metric chosen at runtime.
pub type ShellMetric = Box<dyn ml_widgets::Metric + Send + Sync>;

impl Metric {
    /// Get the `Metric` for the distance function.
    pub fn shell_metric(self) -> ShellMetric {
        match self {
            Self::Euclidean => Box::new(Euclidean),
            Self::Manhattan => Box::new(Manhattan),
            Self::Chebyshev => Box::new(Chebyshev),
        }
    }
}
