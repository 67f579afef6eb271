//! Inter-cluster distances for agglomerative clustering.

use serde::{Deserialize, Serialize};

use crate::{utils, Metric, Point};

/// How the distance between two clusters is computed from their points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Linkage {
    /// The distance between the closest pair of members.
    #[default]
    Single,
    /// The distance between the farthest pair of members.
    Complete,
    /// The mean distance over all pairs of members.
    Average,
    /// The distance between the centroids.
    Centroid,
}

impl Linkage {
    /// The name of the linkage, as shown to learners.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::Average => "average",
            Self::Centroid => "centroid",
        }
    }

    /// The distance between two clusters given by their member indices into
    /// `points` and their centroids.
    #[must_use]
    pub fn distance<M: Metric>(
        &self,
        metric: &M,
        points: &[Point],
        (left, left_centroid): (&[usize], &Point),
        (right, right_centroid): (&[usize], &Point),
    ) -> f64 {
        let pairs = left
            .iter()
            .flat_map(|&i| right.iter().map(move |&j| (i, j)))
            .map(|(i, j)| metric.distance(&points[i], &points[j]));

        match self {
            Self::Single => pairs.fold(f64::INFINITY, f64::min),
            Self::Complete => pairs.fold(0.0, f64::max),
            Self::Average => {
                let (sum, count) = pairs.fold((0.0, 0), |(s, c), d| (s + d, c + 1));
                if count == 0 {
                    f64::INFINITY
                } else {
                    sum / utils::as_f64(count)
                }
            }
            Self::Centroid => metric.distance(left_centroid, right_centroid),
        }
    }
}

impl core::fmt::Display for Linkage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Linkage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "complete" => Ok(Self::Complete),
            "average" => Ok(Self::Average),
            "centroid" => Ok(Self::Centroid),
            _ => Err(format!("Unknown linkage: {s}")),
        }
    }
}
