//! k-nearest-neighbors classification by majority vote.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{core::MaxItem, Metric, Point, SizedHeap};

/// A training point among the nearest neighbors of a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// The index of the training point.
    pub index: usize,
    /// The class of the training point.
    pub class: usize,
    /// The distance from the query.
    pub distance: f64,
}

/// The outcome of classifying a query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The winning class.
    pub class: usize,
    /// The number of votes for each class.
    pub votes: Vec<usize>,
    /// The nearest neighbors, closest first.
    pub neighbors: Vec<Neighbor>,
    /// The distance to the farthest of the nearest neighbors, i.e. the radius
    /// of the circle drawn around the query.
    pub radius: f64,
}

impl Prediction {
    /// The step-by-step explanation shown to learners.
    #[must_use]
    pub fn explanation(&self) -> Vec<String> {
        let mut lines = vec![format!("The {} nearest neighbors:", self.neighbors.len())];
        lines.extend(self.neighbors.iter().enumerate().map(|(rank, n)| {
            format!(
                "{}. point {} (class {}), distance {:.2}",
                rank + 1,
                n.index + 1,
                n.class,
                n.distance
            )
        }));
        lines.extend(
            self.votes
                .iter()
                .enumerate()
                .map(|(class, v)| format!("Class {class}: {v} votes")),
        );
        lines.push(format!(
            "Class {} has the most votes ({} of {}).",
            self.class,
            self.votes[self.class],
            self.neighbors.len()
        ));
        lines
    }
}

/// A k-NN classifier over labelled points in the plane.
#[derive(Debug, Clone)]
pub struct Knn<M: Metric> {
    /// The number of neighbors that vote.
    k: usize,
    /// The distance function.
    metric: M,
    /// The training points.
    points: Vec<Point>,
    /// The class of each training point.
    classes: Vec<usize>,
}

impl<M: Metric> Knn<M> {
    /// Creates an untrained classifier.
    pub const fn new(k: usize, metric: M) -> Self {
        Self {
            k,
            metric,
            points: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Adds a training point.
    pub fn add(&mut self, point: Point, class: usize) {
        self.points.push(point);
        self.classes.push(class);
    }

    /// Removes all training points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.classes.clear();
    }

    /// Changes the number of neighbors that vote.
    pub fn set_k(&mut self, k: usize) {
        self.k = k;
    }

    /// The number of neighbors that vote.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// The training points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The class of each training point.
    #[must_use]
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Rejects queries the classifier cannot answer.
    fn check(&self) -> Result<(), String> {
        if self.k == 0 {
            Err("K must be at least 1".to_string())
        } else if self.points.is_empty() {
            Err("Add some training points first".to_string())
        } else {
            Ok(())
        }
    }

    /// Classifies `query` by a majority vote of its `k` nearest training
    /// points.
    ///
    /// Distance ties are broken by the lower index. Vote ties go to the
    /// higher class.
    ///
    /// # Errors
    ///
    /// If `k` is zero or there are no training points.
    pub fn predict(&self, query: &Point) -> Result<Prediction, String> {
        self.check()?;
        let mut heap = SizedHeap::new(self.k);
        heap.extend(
            self.points
                .iter()
                .enumerate()
                .map(|(i, p)| (self.metric.distance(query, p), i)),
        );
        Ok(self.vote(heap))
    }

    /// Parallel version of [`Knn::predict`](crate::supervised::Knn::predict).
    ///
    /// # Errors
    ///
    /// See [`Knn::predict`](crate::supervised::Knn::predict).
    pub fn par_predict(&self, query: &Point) -> Result<Prediction, String>
    where
        M: Sync,
    {
        self.check()?;
        let mut heap = SizedHeap::new(self.k);
        heap.par_extend(
            self.points
                .par_iter()
                .enumerate()
                .map(|(i, p)| (self.metric.distance(query, p), i)),
        );
        Ok(self.vote(heap))
    }

    /// Tallies the votes of the kept neighbors.
    fn vote(&self, heap: SizedHeap<(f64, usize)>) -> Prediction {
        let neighbors = heap
            .into_sorted_vec()
            .into_iter()
            .map(|(distance, index)| Neighbor {
                index,
                class: self.classes[index],
                distance,
            })
            .collect::<Vec<_>>();

        let n_classes = self.classes.iter().max().map_or(0, |&c| c + 1).max(2);
        let mut votes = vec![0; n_classes];
        for n in &neighbors {
            votes[n.class] += 1;
        }

        let class = votes
            .iter()
            .enumerate()
            .map(|(c, &v)| MaxItem(c, v))
            .max()
            .map_or(0, |MaxItem(c, _)| c);
        let radius = neighbors.last().map_or(0.0, |n| n.distance);

        ftlog::debug!("k-NN voted {votes:?} among {} neighbors", neighbors.len());
        Prediction {
            class,
            votes,
            neighbors,
            radius,
        }
    }
}
