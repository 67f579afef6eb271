//! A macro for implementing `Metric` for smart pointers.

/// Implements `Metric` for a smart pointer by delegating to its target.
macro_rules! impl_metric_block {
    () => {
        fn distance(&self, a: &Point, b: &Point) -> f64 {
            (**self).distance(a, b)
        }

        fn name(&self) -> &str {
            (**self).name()
        }
    };
}

pub(crate) use impl_metric_block;
