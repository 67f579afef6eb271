//! Supervised widgets and the evaluation helpers that go with them.

pub mod binormal;
pub mod confusion;
pub mod cross_validation;
pub mod error_metrics;
pub mod gradient_descent;
pub mod knn;
pub mod linear_regression;
pub mod polynomial_regression;
pub mod svm;

pub use binormal::Binormal;
pub use confusion::ConfusionMatrix;
pub use cross_validation::{cross_validate, CvReport, KFold};
pub use gradient_descent::GradientDescent;
pub use knn::Knn;
pub use linear_regression::LinearRegression;
pub use svm::Svm;
