//! Bottom-up agglomerative clustering, one merge per step.

mod dendrogram;
mod linkage;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{core::MinItem, playback::Stepper, Journal, Metric, Point};

pub use dendrogram::{Dendrogram, Joint};
pub use linkage::Linkage;

/// A cluster in the merge tree.
///
/// Leaves are the points themselves, with ids `0..n`. Every merge appends a
/// node whose id is the next free index. Nodes never change once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// The index of this node in the arena.
    pub id: usize,
    /// The indices of the points in this cluster.
    pub members: Vec<usize>,
    /// The mean of the member points.
    pub centroid: Point,
    /// The first merged child, `None` for leaves.
    pub left: Option<usize>,
    /// The second merged child, `None` for leaves.
    pub right: Option<usize>,
    /// The linkage distance at which the children were merged, 0 for leaves.
    pub height: f64,
}

impl Node {
    /// Whether the node is a single point.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none()
    }
}

/// The record of a single merge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Merge {
    /// The id of the first merged cluster.
    pub left: usize,
    /// The id of the second merged cluster.
    pub right: usize,
    /// The id of the new cluster.
    pub node: usize,
    /// The linkage distance between the merged clusters.
    pub distance: f64,
    /// The number of clusters after the merge.
    pub clusters: usize,
}

/// Step-wise agglomerative clustering.
#[derive(Debug, Clone)]
pub struct Agglomerative<M: Metric> {
    /// The points.
    points: Vec<Point>,
    /// The linkage rule.
    linkage: Linkage,
    /// The number of clusters at which merging stops.
    target: usize,
    /// The distance function.
    metric: M,
    /// The node arena.
    nodes: Vec<Node>,
    /// The ids of the current clusters, in merge order.
    active: Vec<usize>,
    /// The explanation log.
    journal: Journal,
}

impl<M: Metric> Agglomerative<M> {
    /// Creates a new `Agglomerative` with every point in its own cluster.
    ///
    /// # Errors
    ///
    /// If `target_clusters` is zero.
    pub fn new(points: Vec<Point>, linkage: Linkage, target_clusters: usize, metric: M) -> Result<Self, String> {
        Self::check_target(target_clusters)?;
        let mut engine = Self {
            points,
            linkage,
            target: target_clusters,
            metric,
            nodes: Vec::new(),
            active: Vec::new(),
            journal: Journal::new(),
        };
        engine.reset();
        Ok(engine)
    }

    /// Rejects a target of zero clusters.
    fn check_target(target: usize) -> Result<(), String> {
        if target == 0 {
            Err("The target number of clusters must be at least 1".to_string())
        } else {
            Ok(())
        }
    }

    /// Puts every point back in its own cluster.
    pub fn reset(&mut self) {
        self.nodes = self
            .points
            .iter()
            .enumerate()
            .map(|(i, &p)| Node {
                id: i,
                members: vec![i],
                centroid: p,
                left: None,
                right: None,
                height: 0.0,
            })
            .collect();
        self.active = (0..self.points.len()).collect();
        self.journal.clear();
    }

    /// Adds a point. This resets the merges.
    pub fn add_point(&mut self, point: Point) -> usize {
        self.points.push(point);
        self.reset();
        self.points.len() - 1
    }

    /// Removes all points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.reset();
    }

    /// Changes the linkage rule. This resets the merges.
    pub fn set_linkage(&mut self, linkage: Linkage) {
        self.linkage = linkage;
        self.reset();
    }

    /// Changes the number of clusters at which merging stops. Merges already
    /// done are kept.
    ///
    /// # Errors
    ///
    /// If `target_clusters` is zero.
    pub fn set_target(&mut self, target_clusters: usize) -> Result<(), String> {
        Self::check_target(target_clusters)?;
        self.target = target_clusters;
        Ok(())
    }

    /// Whether the number of clusters has reached the target.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.active.len() <= self.target
    }

    /// The linkage distance between two nodes.
    fn linkage_distance(&self, a: usize, b: usize) -> f64 {
        let (a, b) = (&self.nodes[a], &self.nodes[b]);
        self.linkage.distance(
            &self.metric,
            &self.points,
            (&a.members, &a.centroid),
            (&b.members, &b.centroid),
        )
    }

    /// All pairs of positions in the active set, in scan order.
    fn pairs(&self) -> Vec<(usize, usize)> {
        let n = self.active.len();
        (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))).collect()
    }

    /// Merges the closest pair of clusters.
    ///
    /// Pairs are scanned in order and the first one with the smallest linkage
    /// distance wins. Returns `None` once the target is reached.
    ///
    /// # Errors
    ///
    /// If there are no points.
    pub fn step(&mut self) -> Result<Option<Merge>, String> {
        self.check_points()?;
        if self.is_finished() {
            return Ok(None);
        }
        let closest = self
            .pairs()
            .into_iter()
            .map(|(i, j)| MinItem((i, j), self.linkage_distance(self.active[i], self.active[j])))
            .min();
        Ok(closest.map(|MinItem((i, j), d)| self.merge(i, j, d)))
    }

    /// Parallel version of [`Agglomerative::step`](crate::unsupervised::Agglomerative::step).
    ///
    /// The distances are computed in parallel and the pair is still chosen by
    /// scan order, so both versions make the same merge.
    ///
    /// # Errors
    ///
    /// See [`Agglomerative::step`](crate::unsupervised::Agglomerative::step).
    pub fn par_step(&mut self) -> Result<Option<Merge>, String>
    where
        M: Sync,
    {
        self.check_points()?;
        if self.is_finished() {
            return Ok(None);
        }
        let pairs = self.pairs();
        let distances = pairs
            .par_iter()
            .map(|&(i, j)| self.linkage_distance(self.active[i], self.active[j]))
            .collect::<Vec<_>>();
        let closest = pairs
            .into_iter()
            .zip(distances)
            .map(|(ij, d)| MinItem(ij, d))
            .min();
        Ok(closest.map(|MinItem((i, j), d)| self.merge(i, j, d)))
    }

    /// Rejects stepping without points.
    fn check_points(&self) -> Result<(), String> {
        if self.points.is_empty() {
            Err("Add some points before clustering".to_string())
        } else {
            Ok(())
        }
    }

    /// Merges the clusters at positions `i < j` of the active set.
    fn merge(&mut self, i: usize, j: usize, distance: f64) -> Merge {
        if self.journal.is_empty() {
            self.journal.record(
                "Start",
                vec![
                    format!("Linkage: {}", self.linkage),
                    format!("Target clusters: {}", self.target),
                ],
            );
        }

        let (left, right) = (self.active[i], self.active[j]);
        let members = self.nodes[left]
            .members
            .iter()
            .chain(&self.nodes[right].members)
            .copied()
            .collect::<Vec<_>>();
        let centroid = Point::mean(members.iter().map(|&m| &self.points[m])).unwrap_or_default();

        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            members,
            centroid,
            left: Some(left),
            right: Some(right),
            height: distance,
        });

        let before = self.active.len();
        self.active.remove(j);
        self.active.remove(i);
        self.active.push(id);

        self.journal.record(
            format!("Merge {} -> {} clusters", before, self.active.len()),
            vec![format!("Distance ({}): {distance:.2}", self.linkage)],
        );
        ftlog::debug!("Merged nodes {left} and {right} into {id} at height {distance:.3}");
        if self.is_finished() {
            ftlog::info!("Reached {} clusters after {} merges", self.active.len(), self.merges());
        }

        Merge {
            left,
            right,
            node: id,
            distance,
            clusters: self.active.len(),
        }
    }

    /// Merges until the target is reached and returns the number of merges made.
    ///
    /// # Errors
    ///
    /// See [`Agglomerative::step`](crate::unsupervised::Agglomerative::step).
    pub fn run(&mut self) -> Result<usize, String> {
        let mut count = 0;
        while self.step()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// The position in the active set of the cluster containing each point.
    #[must_use]
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.points.len()];
        for (pos, &id) in self.active.iter().enumerate() {
            for &m in &self.nodes[id].members {
                labels[m] = pos;
            }
        }
        labels
    }

    /// Lays out the dendrogram of the current forest.
    #[must_use]
    pub fn dendrogram(&self) -> Dendrogram {
        Dendrogram::layout(&self.nodes, &self.active, self.points.len())
    }

    /// The number of merges made so far.
    #[must_use]
    pub fn merges(&self) -> usize {
        self.nodes.len() - self.points.len()
    }

    /// The merged nodes in the order they were made.
    #[must_use]
    pub fn merge_history(&self) -> &[Node] {
        &self.nodes[self.points.len()..]
    }

    /// The current clusters, in merge order.
    pub fn clusters(&self) -> impl Iterator<Item = &Node> {
        self.active.iter().map(|&id| &self.nodes[id])
    }

    /// The number of current clusters.
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.active.len()
    }

    /// The node arena.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The linkage rule.
    #[must_use]
    pub const fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// The number of clusters at which merging stops.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// The explanation log.
    #[must_use]
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    /// A serializable snapshot of the state, for redrawing.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            linkage: self.linkage,
            target: self.target,
            points: self.points.clone(),
            labels: self.labels(),
            clusters: self.clusters().cloned().collect(),
            dendrogram: self.dendrogram(),
        }
    }
}

/// Everything a renderer needs to draw the hierarchical clustering widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The linkage rule.
    pub linkage: Linkage,
    /// The target number of clusters.
    pub target: usize,
    /// The points.
    pub points: Vec<Point>,
    /// The cluster position of every point.
    pub labels: Vec<usize>,
    /// The current clusters.
    pub clusters: Vec<Node>,
    /// The dendrogram layout.
    pub dendrogram: Dendrogram,
}

impl<M: Metric> Stepper for Agglomerative<M> {
    fn advance(&mut self) -> Result<(), String> {
        self.step().map(|_| ())
    }

    fn is_finished(&self) -> bool {
        Self::is_finished(self)
    }
}
