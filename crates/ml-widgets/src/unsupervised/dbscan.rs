//! Step-wise DBSCAN.
//!
//! The engine alternates between two phases. In `PickPoint` it takes the
//! lowest-index unvisited point and tests the size of its ε-neighborhood
//! against `min_pts`: a dense point opens a new cluster and seeds the
//! expansion queue, a sparse one is tagged as noise for now. In `Expand` it
//! pops one queued point per step, tags it core or border, and pulls any
//! unassigned neighbors of core points into the cluster. A noise point that
//! later turns up in a core point's neighborhood is re-tagged as border.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{
    point::label,
    playback::Stepper,
    Journal, Metric, Point,
};

/// The parameters of DBSCAN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbscanParams {
    /// The neighborhood radius.
    pub epsilon: f64,
    /// The minimum neighborhood size, the point itself included, for a point
    /// to be a core point.
    pub min_pts: usize,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            epsilon: 30.0,
            min_pts: 3,
        }
    }
}

impl DbscanParams {
    /// Checks that the parameters are usable.
    ///
    /// # Errors
    ///
    /// * If `epsilon` is not a positive, finite number.
    /// * If `min_pts` is zero.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(format!("Epsilon must be positive, got {}", self.epsilon));
        }
        if self.min_pts == 0 {
            return Err("MinPts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// The classification of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointKind {
    /// Not yet reached by the algorithm.
    Unvisited,
    /// Has at least `min_pts` points in its neighborhood.
    Core,
    /// Belongs to a cluster but is not dense itself.
    Border,
    /// Is not dense and belongs to no cluster.
    Noise,
}

/// The phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Points may be added; the algorithm has not started.
    Idle,
    /// The next step examines the next unvisited point.
    PickPoint,
    /// The next step examines the next queued point of the current cluster.
    Expand,
    /// Every point has been visited.
    Finished,
}

/// The per-point state kept alongside the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Tag {
    /// The classification.
    kind: PointKind,
    /// Whether the neighborhood of the point has been examined.
    visited: bool,
    /// Whether the point is waiting in the expansion queue.
    queued: bool,
    /// The cluster the point belongs to.
    cluster: Option<usize>,
}

impl Tag {
    /// The tag of a point the algorithm has not reached.
    const FRESH: Self = Self {
        kind: PointKind::Unvisited,
        visited: false,
        queued: false,
        cluster: None,
    };
}

/// Step-wise DBSCAN over points in the plane.
#[derive(Debug, Clone)]
pub struct Dbscan<M: Metric> {
    /// The points.
    points: Vec<Point>,
    /// The tags, parallel to `points`.
    tags: Vec<Tag>,
    /// The parameters.
    params: DbscanParams,
    /// The distance function.
    metric: M,
    /// The phase of the state machine.
    phase: Phase,
    /// Points of the current cluster whose neighborhoods are still to be examined.
    queue: VecDeque<usize>,
    /// The point examined by the latest step.
    current: Option<usize>,
    /// The neighborhood of `current`.
    neighbors: Vec<usize>,
    /// The number of clusters opened so far.
    n_clusters: usize,
    /// The explanation log.
    journal: Journal,
}

impl<M: Metric> Dbscan<M> {
    /// Creates a new, idle `Dbscan`.
    ///
    /// # Errors
    ///
    /// If the parameters are invalid.
    pub fn new(points: Vec<Point>, params: DbscanParams, metric: M) -> Result<Self, String> {
        params.validate()?;
        let tags = vec![Tag::FRESH; points.len()];
        Ok(Self {
            points,
            tags,
            params,
            metric,
            phase: Phase::Idle,
            queue: VecDeque::new(),
            current: None,
            neighbors: Vec::new(),
            n_clusters: 0,
            journal: Journal::new(),
        })
    }

    /// Adds a point and returns its index.
    ///
    /// # Errors
    ///
    /// If the algorithm is running.
    pub fn add_point(&mut self, point: Point) -> Result<usize, String> {
        if self.phase != Phase::Idle {
            return Err("Points cannot be added while DBSCAN is running".to_string());
        }
        self.points.push(point);
        self.tags.push(Tag::FRESH);
        Ok(self.points.len() - 1)
    }

    /// Replaces the parameters. This resets the algorithm.
    ///
    /// # Errors
    ///
    /// If the parameters are invalid.
    pub fn set_params(&mut self, params: DbscanParams) -> Result<(), String> {
        params.validate()?;
        self.params = params;
        self.reset();
        Ok(())
    }

    /// Starts the algorithm from scratch on the current points.
    ///
    /// # Errors
    ///
    /// If there are no points.
    pub fn start(&mut self) -> Result<(), String> {
        if self.points.is_empty() {
            return Err("Add some points before starting DBSCAN".to_string());
        }
        self.reset();
        self.phase = Phase::PickPoint;
        self.journal.record(
            "Start",
            vec![format!(
                "Parameters: epsilon = {}, MinPts = {}",
                self.params.epsilon, self.params.min_pts
            )],
        );
        ftlog::debug!(
            "Starting DBSCAN on {} points with epsilon = {} and min_pts = {}",
            self.points.len(),
            self.params.epsilon,
            self.params.min_pts
        );
        Ok(())
    }

    /// Performs one step and returns the phase after it.
    ///
    /// # Errors
    ///
    /// If the algorithm has not been started.
    pub fn step(&mut self) -> Result<Phase, String> {
        match self.phase {
            Phase::Idle => return Err("DBSCAN has not been started".to_string()),
            Phase::PickPoint => self.pick_point(),
            Phase::Expand => self.expand(),
            Phase::Finished => (),
        }
        Ok(self.phase)
    }

    /// Runs the algorithm to completion, starting it if needed, and returns
    /// the number of steps taken.
    ///
    /// # Errors
    ///
    /// If there are no points.
    pub fn run(&mut self) -> Result<usize, String> {
        if self.phase == Phase::Idle {
            self.start()?;
        }
        let mut steps = 0;
        while self.phase != Phase::Finished {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Forgets all classifications but keeps the points and parameters.
    pub fn reset(&mut self) {
        self.tags.iter_mut().for_each(|t| *t = Tag::FRESH);
        self.phase = Phase::Idle;
        self.queue.clear();
        self.current = None;
        self.neighbors.clear();
        self.n_clusters = 0;
        self.journal.clear();
    }

    /// Removes all points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.tags.clear();
        self.reset();
    }

    /// Examines the lowest-index unvisited point.
    fn pick_point(&mut self) {
        let Some(index) = self.tags.iter().position(|t| !t.visited) else {
            self.finish();
            return;
        };

        self.tags[index].visited = true;
        self.current = Some(index);
        self.neighbors = self.region_query(index);

        let mut lines = vec![format!(
            "Found {} neighbors of {} within epsilon = {}.",
            self.neighbors.len(),
            label(index),
            self.params.epsilon
        )];

        if self.neighbors.len() >= self.params.min_pts {
            let cluster = self.n_clusters;
            self.n_clusters += 1;
            self.tags[index].kind = PointKind::Core;
            self.tags[index].cluster = Some(cluster);
            lines.push(format!(
                "{} >= {} so {} is a core point. Opening cluster C{}.",
                self.neighbors.len(),
                self.params.min_pts,
                label(index),
                cluster + 1
            ));
            lines.extend(self.absorb_neighbors(cluster));
            self.phase = Phase::Expand;
            ftlog::debug!("{} opened cluster {cluster}", label(index));
        } else {
            self.tags[index].kind = PointKind::Noise;
            lines.push(format!(
                "{} < {} so {} is noise for now.",
                self.neighbors.len(),
                self.params.min_pts,
                label(index)
            ));
        }

        self.journal.record(format!("Check {}", label(index)), lines);
    }

    /// Examines the next queued point of the current cluster.
    fn expand(&mut self) {
        let cluster = self.n_clusters - 1;

        let Some(index) = self.queue.pop_front() else {
            self.phase = Phase::PickPoint;
            self.current = None;
            self.neighbors.clear();
            self.journal.record(
                format!("Cluster C{} done", cluster + 1),
                vec![format!(
                    "Expansion of C{} is complete. Looking for another unvisited point.",
                    cluster + 1
                )],
            );
            return;
        };

        let tag = &mut self.tags[index];
        tag.queued = false;
        tag.visited = true;
        self.current = Some(index);
        self.neighbors = self.region_query(index);

        let mut lines = vec![format!(
            "Examining the neighbors of {} in cluster C{}.",
            label(index),
            cluster + 1
        )];

        if self.neighbors.len() >= self.params.min_pts {
            self.tags[index].kind = PointKind::Core;
            lines.push(format!(
                "{} >= {} so {} is a core point.",
                self.neighbors.len(),
                self.params.min_pts,
                label(index)
            ));
            lines.extend(self.absorb_neighbors(cluster));
        } else {
            self.tags[index].kind = PointKind::Border;
            lines.push(format!(
                "{} < {} so {} is a border point.",
                self.neighbors.len(),
                self.params.min_pts,
                label(index)
            ));
        }

        self.journal.record(format!("Expand cluster C{}", cluster + 1), lines);
    }

    /// Pulls every unassigned neighbor of the current core point into
    /// `cluster`, queueing those that still need their neighborhoods examined.
    ///
    /// Returns a journal line per absorbed point.
    fn absorb_neighbors(&mut self, cluster: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for &n in &self.neighbors {
            let tag = &mut self.tags[n];
            if tag.cluster.is_some() {
                continue;
            }

            tag.cluster = Some(cluster);
            let was_noise = tag.kind == PointKind::Noise;
            if tag.kind != PointKind::Core {
                tag.kind = PointKind::Border;
            }
            if !tag.visited && !tag.queued {
                tag.queued = true;
                self.queue.push_back(n);
            }

            lines.push(if was_noise {
                format!("Adding {} (previously noise) to C{}.", label(n), cluster + 1)
            } else {
                format!("Adding {} to C{}.", label(n), cluster + 1)
            });
        }
        lines
    }

    /// Returns the indices of all points within `epsilon` of the indexed
    /// point, itself included, in index order.
    fn region_query(&self, index: usize) -> Vec<usize> {
        let center = &self.points[index];
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| self.metric.distance(center, p) <= self.params.epsilon)
            .map(|(i, _)| i)
            .collect()
    }

    /// Moves to the terminal phase.
    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.current = None;
        self.neighbors.clear();
        self.journal.record(
            "Finished",
            vec![format!(
                "All points visited: {} clusters, {} noise points.",
                self.n_clusters,
                self.noise_count()
            )],
        );
        ftlog::info!(
            "DBSCAN finished with {} clusters and {} noise points",
            self.n_clusters,
            self.noise_count()
        );
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The parameters.
    #[must_use]
    pub const fn params(&self) -> &DbscanParams {
        &self.params
    }

    /// The points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The classification of every point.
    #[must_use]
    pub fn kinds(&self) -> Vec<PointKind> {
        self.tags.iter().map(|t| t.kind).collect()
    }

    /// The classification of the indexed point.
    #[must_use]
    pub fn kind_of(&self, index: usize) -> PointKind {
        self.tags[index].kind
    }

    /// The cluster of the indexed point, if any.
    #[must_use]
    pub fn cluster_of(&self, index: usize) -> Option<usize> {
        self.tags[index].cluster
    }

    /// The cluster of every point.
    #[must_use]
    pub fn labels(&self) -> Vec<Option<usize>> {
        self.tags.iter().map(|t| t.cluster).collect()
    }

    /// The point examined by the latest step.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// The neighborhood of the point examined by the latest step.
    #[must_use]
    pub fn current_neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// The indices waiting in the expansion queue.
    #[must_use]
    pub fn queued(&self) -> Vec<usize> {
        self.queue.iter().copied().collect()
    }

    /// The number of clusters found so far.
    #[must_use]
    pub const fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// The number of points currently tagged as noise.
    #[must_use]
    pub fn noise_count(&self) -> usize {
        self.tags.iter().filter(|t| t.kind == PointKind::Noise).count()
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
            phase: self.phase,
            params: self.params,
            points: self.points.clone(),
            kinds: self.kinds(),
            labels: self.labels(),
            current: self.current,
            neighbors: self.neighbors.clone(),
            n_clusters: self.n_clusters,
            noise_count: self.noise_count(),
        }
    }
}

/// Everything a renderer needs to draw the DBSCAN widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The phase.
    pub phase: Phase,
    /// The parameters; `epsilon` is the radius of the highlighted circle.
    pub params: DbscanParams,
    /// The points.
    pub points: Vec<Point>,
    /// The classification of every point.
    pub kinds: Vec<PointKind>,
    /// The cluster of every point.
    pub labels: Vec<Option<usize>>,
    /// The highlighted point.
    pub current: Option<usize>,
    /// The neighborhood of the highlighted point.
    pub neighbors: Vec<usize>,
    /// The number of clusters.
    pub n_clusters: usize,
    /// The number of noise points.
    pub noise_count: usize,
}

impl<M: Metric> Stepper for Dbscan<M> {
    fn advance(&mut self) -> Result<(), String> {
        self.step().map(|_| ())
    }

    fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}
