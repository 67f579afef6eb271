//! Step-wise k-means with Forgy initialization.

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{core::MinItem, point::label, playback::Stepper, Journal, Point};

/// The parameters of k-means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KMeansParams {
    /// The number of clusters.
    pub k: usize,
    /// A centroid that moves by more than this distance in an update keeps
    /// the algorithm going.
    pub threshold: f64,
    /// The number of updates after which the algorithm stops regardless.
    pub max_iterations: usize,
    /// Journal the distance calculations for every point instead of only the
    /// first, as long as there are at most 20 points.
    pub verbose: bool,
    /// The seed for choosing the initial centroids.
    pub seed: Option<u64>,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            k: 3,
            threshold: 0.5,
            max_iterations: 100,
            verbose: false,
            seed: None,
        }
    }
}

/// The phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KMeansPhase {
    /// Not started.
    Idle,
    /// Centroids have been chosen.
    Initialized,
    /// Points have been assigned to their nearest centroids.
    Assigned,
    /// Centroids have moved to the means of their clusters.
    Updated,
    /// The centroids stopped moving or the iteration cap was hit.
    Converged,
}

/// The most points for which verbose mode journals every distance.
const VERBOSE_LIMIT: usize = 20;

/// Step-wise k-means.
#[derive(Debug, Clone)]
pub struct KMeans {
    /// The points.
    points: Vec<Point>,
    /// The parameters.
    params: KMeansParams,
    /// The cluster of every point.
    assignments: Vec<Option<usize>>,
    /// The centroids.
    centroids: Vec<Point>,
    /// The centroids before the latest update.
    previous: Vec<Point>,
    /// The number of completed updates.
    iteration: usize,
    /// The phase.
    phase: KMeansPhase,
    /// The explanation log.
    journal: Journal,
}

impl KMeans {
    /// Creates a new, idle `KMeans`.
    ///
    /// # Errors
    ///
    /// If `k` or `max_iterations` is zero, or `threshold` is negative.
    pub fn new(points: Vec<Point>, params: KMeansParams) -> Result<Self, String> {
        Self::validate(&params)?;
        let assignments = vec![None; points.len()];
        Ok(Self {
            points,
            params,
            assignments,
            centroids: Vec::new(),
            previous: Vec::new(),
            iteration: 0,
            phase: KMeansPhase::Idle,
            journal: Journal::new(),
        })
    }

    /// Checks the parameters.
    fn validate(params: &KMeansParams) -> Result<(), String> {
        if params.k == 0 {
            Err("K must be at least 1".to_string())
        } else if params.max_iterations == 0 {
            Err("The iteration cap must be at least 1".to_string())
        } else if params.threshold.is_nan() || params.threshold < 0.0 {
            Err(format!("The movement threshold must be non-negative, got {}", params.threshold))
        } else {
            Ok(())
        }
    }

    /// Replaces the parameters. This resets the algorithm.
    ///
    /// # Errors
    ///
    /// See [`KMeans::new`](crate::unsupervised::KMeans::new).
    pub fn set_params(&mut self, params: KMeansParams) -> Result<(), String> {
        Self::validate(&params)?;
        self.params = params;
        self.reset();
        Ok(())
    }

    /// Adds a point and returns its index.
    ///
    /// # Errors
    ///
    /// If the algorithm is running.
    pub fn add_point(&mut self, point: Point) -> Result<usize, String> {
        if self.is_running() {
            return Err("Points cannot be added while k-means is running".to_string());
        }
        self.points.push(point);
        self.assignments.push(None);
        Ok(self.points.len() - 1)
    }

    /// Whether the algorithm has started and not yet converged.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !matches!(self.phase, KMeansPhase::Idle | KMeansPhase::Converged)
    }

    /// Picks `k` distinct points as the initial centroids.
    ///
    /// # Errors
    ///
    /// If there are fewer than `k` points.
    pub fn start(&mut self) -> Result<(), String> {
        let k = self.params.k;
        if self.points.len() < k {
            return Err(format!("At least {k} points are needed for {k} clusters"));
        }
        self.reset();

        let mut rng = self
            .params
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        self.centroids = rand::seq::index::sample(&mut rng, self.points.len(), k)
            .into_iter()
            .map(|i| self.points[i])
            .collect();
        self.phase = KMeansPhase::Initialized;

        let mut lines = vec!["Initial centroids chosen at random from the data:".to_string()];
        lines.extend(
            self.centroids
                .iter()
                .enumerate()
                .map(|(c, p)| format!("C{}: {p}", c + 1)),
        );
        self.journal.record("Initialization", lines);
        ftlog::debug!("Starting k-means with k = {k} on {} points", self.points.len());
        Ok(())
    }

    /// Performs one assign or update step and returns the phase after it.
    ///
    /// # Errors
    ///
    /// If the algorithm has not been started.
    pub fn step(&mut self) -> Result<KMeansPhase, String> {
        match self.phase {
            KMeansPhase::Idle => return Err("k-means has not been started".to_string()),
            KMeansPhase::Initialized | KMeansPhase::Updated => {
                self.assign();
                self.phase = KMeansPhase::Assigned;
            }
            KMeansPhase::Assigned => {
                let moved = self.update();
                self.iteration += 1;
                self.phase = if moved && self.iteration < self.params.max_iterations {
                    KMeansPhase::Updated
                } else {
                    ftlog::info!(
                        "k-means converged after {} iterations with inertia {:.3}",
                        self.iteration,
                        self.inertia()
                    );
                    KMeansPhase::Converged
                };
            }
            KMeansPhase::Converged => (),
        }
        Ok(self.phase)
    }

    /// Runs the algorithm to convergence, starting it if needed, and returns
    /// the number of steps taken.
    ///
    /// # Errors
    ///
    /// See [`KMeans::start`](crate::unsupervised::KMeans::start).
    pub fn run(&mut self) -> Result<usize, String> {
        if self.phase == KMeansPhase::Idle {
            self.start()?;
        }
        let mut steps = 0;
        while self.phase != KMeansPhase::Converged {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Assigns every point to its nearest centroid, the first one on ties.
    fn assign(&mut self) {
        let log_all = self.params.verbose && self.points.len() <= VERBOSE_LIMIT;
        let mut lines = Vec::new();

        for (idx, point) in self.points.iter().enumerate() {
            let distances = self.centroids.iter().map(|c| point.distance(c)).collect::<Vec<_>>();
            let nearest = distances
                .iter()
                .enumerate()
                .map(|(c, &d)| MinItem(c, d))
                .min()
                .map(|MinItem(c, _)| c);
            self.assignments[idx] = nearest;

            if log_all || idx == 0 {
                lines.push(format!("{} {point}:", label(idx)));
                lines.extend(self.centroids.iter().zip(&distances).enumerate().map(|(c, (centroid, d))| {
                    format!(
                        "d({}, C{}) = sqrt(({:.0} - {:.0})^2 + ({:.0} - {:.0})^2) = {d:.1}",
                        label(idx),
                        c + 1,
                        point.x,
                        centroid.x,
                        point.y,
                        centroid.y
                    )
                }));
                if let Some(c) = nearest {
                    lines.push(format!(
                        "{:.1} is the smallest distance, so {} joins cluster {}.",
                        distances[c],
                        label(idx),
                        c + 1
                    ));
                }
            }
        }
        if !log_all && self.points.len() > VERBOSE_LIMIT {
            lines.push(format!("...and so on for all {} points.", self.points.len()));
        }

        self.journal
            .record(format!("Assignment (iteration {})", self.iteration + 1), lines);
        ftlog::debug!("k-means iteration {}: assigned points", self.iteration + 1);
    }

    /// Moves every centroid to the mean of its members and returns whether
    /// any moved by more than the threshold. Empty clusters stay put.
    fn update(&mut self) -> bool {
        self.previous = self.centroids.clone();
        let mut moved = false;
        let mut lines = Vec::new();

        for (c, centroid) in self.centroids.iter_mut().enumerate() {
            let members = self
                .points
                .iter()
                .zip(&self.assignments)
                .filter(|(_, a)| **a == Some(c))
                .map(|(p, _)| p)
                .collect::<Vec<_>>();

            let Some(mean) = Point::mean(members.iter().copied()) else {
                lines.push(format!("Cluster {}: no members, position unchanged.", c + 1));
                continue;
            };

            let preview = |f: fn(&Point) -> f64| {
                let head = members.iter().take(3).map(|p| format!("{:.0}", f(p))).collect::<Vec<_>>();
                let tail = if members.len() > 3 { "..." } else { "" };
                format!("({}{tail}) / {}", head.join(" + "), members.len())
            };
            lines.push(format!("Cluster {} ({} points):", c + 1, members.len()));
            lines.push(format!("x_new = {} = {:.1}", preview(|p| p.x), mean.x));
            lines.push(format!("y_new = {} = {:.1}", preview(|p| p.y), mean.y));
            lines.push(format!("Position: {centroid} -> {mean}"));

            if centroid.distance(&mean) > self.params.threshold {
                moved = true;
            }
            *centroid = mean;
        }

        self.journal
            .record(format!("Centroid update (iteration {})", self.iteration + 1), lines);
        ftlog::debug!(
            "k-means iteration {}: centroids moved = {moved}, inertia = {:.3}",
            self.iteration + 1,
            self.inertia()
        );
        moved
    }

    /// Forgets the centroids and assignments but keeps the points.
    pub fn reset(&mut self) {
        self.assignments.iter_mut().for_each(|a| *a = None);
        self.centroids.clear();
        self.previous.clear();
        self.iteration = 0;
        self.phase = KMeansPhase::Idle;
        self.journal.clear();
    }

    /// Removes all points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.assignments.clear();
        self.reset();
    }

    /// The sum of squared distances from each assigned point to its centroid.
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.points
            .iter()
            .zip(&self.assignments)
            .filter_map(|(p, a)| a.map(|c| p.distance_sq(&self.centroids[c])))
            .sum()
    }

    /// The number of points in each cluster.
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        self.assignments.iter().flatten().for_each(|&c| sizes[c] += 1);
        sizes
    }

    /// The phase.
    #[must_use]
    pub const fn phase(&self) -> KMeansPhase {
        self.phase
    }

    /// The parameters.
    #[must_use]
    pub const fn params(&self) -> &KMeansParams {
        &self.params
    }

    /// The number of completed updates.
    #[must_use]
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    /// The points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The centroids.
    #[must_use]
    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    /// The centroids before the latest update, drawn as ghosts.
    #[must_use]
    pub fn previous_centroids(&self) -> &[Point] {
        &self.previous
    }

    /// The cluster of every point.
    #[must_use]
    pub fn assignments(&self) -> &[Option<usize>] {
        &self.assignments
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
            iteration: self.iteration,
            points: self.points.clone(),
            assignments: self.assignments.clone(),
            centroids: self.centroids.clone(),
            previous_centroids: self.previous.clone(),
            inertia: self.inertia(),
        }
    }
}

/// Everything a renderer needs to draw the k-means widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The phase.
    pub phase: KMeansPhase,
    /// The number of completed updates.
    pub iteration: usize,
    /// The points.
    pub points: Vec<Point>,
    /// The cluster of every point.
    pub assignments: Vec<Option<usize>>,
    /// The centroids.
    pub centroids: Vec<Point>,
    /// The centroids before the latest update.
    pub previous_centroids: Vec<Point>,
    /// The inertia.
    pub inertia: f64,
}

impl Stepper for KMeans {
    fn advance(&mut self) -> Result<(), String> {
        self.step().map(|_| ())
    }

    fn is_finished(&self) -> bool {
        self.phase == KMeansPhase::Converged
    }
}
