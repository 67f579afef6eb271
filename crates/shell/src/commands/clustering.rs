//! Subcommands for the clustering widgets.

use std::{path::PathBuf, time::Duration};

use clap::Args;
use ml_widgets::{
    playback::{Playback, StopHandle},
    unsupervised::{
        dbscan::{DbscanParams, Phase},
        hierarchical::Linkage,
        kmeans::KMeansParams,
        Agglomerative, Dbscan, KMeans,
    },
    Point,
};
use planegen::{clusters, Canvas};

use super::{make_rng, to_points};
use crate::{metrics::Metric, output};

/// The generated point clouds.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Shape {
    Blobs,
    Moons,
    Circles,
}

impl Shape {
    /// Generates the shape at the size a widget uses.
    fn generate(self, small: bool, seed: Option<u64>) -> Vec<Point> {
        let canvas = Canvas::default();
        let mut rng = make_rng(seed);
        let coords = match (self, small) {
            (Self::Blobs, false) => clusters::blobs(&canvas, &clusters::BlobParams::default(), &mut rng),
            (Self::Blobs, true) => clusters::blobs(&canvas, &clusters::BlobParams::hierarchical(), &mut rng),
            (Self::Moons, false) => clusters::moons(&canvas, &clusters::MoonParams::default(), &mut rng),
            (Self::Moons, true) => clusters::moons(&canvas, &clusters::MoonParams::hierarchical(), &mut rng),
            (Self::Circles, false) => clusters::circles(&canvas, &clusters::CircleParams::default(), &mut rng),
            (Self::Circles, true) => clusters::circles(&canvas, &clusters::CircleParams::hierarchical(), &mut rng),
        };
        to_points(coords)
    }
}

#[derive(Args, Debug)]
pub struct KMeansArgs {
    /// The number of clusters.
    #[arg(short('k'), long, default_value_t = 3)]
    k: usize,

    /// The number of points. Random blob sizes are used if not given.
    #[arg(short('n'), long)]
    points: Option<usize>,

    /// Centroids moving less than this count as settled.
    #[arg(short('t'), long, default_value_t = 0.5)]
    threshold: f64,

    /// Explain the distance calculations for every point.
    #[arg(short('v'), long, default_value_t = false)]
    verbose: bool,

    /// Where to write the final snapshot as JSON.
    #[arg(short('o'), long)]
    out: Option<PathBuf>,
}

/// Runs k-means to convergence and prints the journal.
pub fn kmeans(args: &KMeansArgs, seed: Option<u64>) -> Result<(), String> {
    let canvas = Canvas::default();
    let mut rng = make_rng(seed);
    let mut blob_params = clusters::BlobParams::kmeans(&canvas, &mut rng);
    if let Some(n) = args.points {
        blob_params.n = n;
    }
    let points = to_points(clusters::blobs(&canvas, &blob_params, &mut rng));

    let params = KMeansParams {
        k: args.k,
        threshold: args.threshold,
        verbose: args.verbose,
        seed,
        ..KMeansParams::default()
    };
    let mut model = KMeans::new(points, params)?;
    let steps = model.run()?;

    output::print_journal(model.journal());
    println!(
        "Converged after {steps} steps ({} updates), inertia {:.3}",
        model.iteration(),
        model.inertia()
    );
    for (c, (centroid, size)) in model.centroids().iter().zip(model.cluster_sizes()).enumerate() {
        println!("C{}: {centroid} with {size} points", c + 1);
    }

    output::save_json(&model.snapshot(), args.out.as_deref())
}

#[derive(Args, Debug)]
pub struct DbscanArgs {
    /// The point cloud to cluster.
    #[arg(long, default_value = "moons")]
    shape: Shape,

    /// The neighborhood radius.
    #[arg(short('e'), long, default_value_t = 30.0)]
    epsilon: f64,

    /// The neighborhood size of a core point, itself included.
    #[arg(short('m'), long, default_value_t = 3)]
    min_pts: usize,

    /// The distance function.
    #[arg(long, default_value = "euclidean")]
    metric: Metric,

    /// The pause between steps, for watching the algorithm work.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Where to write the final snapshot as JSON.
    #[arg(short('o'), long)]
    out: Option<PathBuf>,
}

/// Plays DBSCAN step by step and prints each cluster as it closes.
pub fn dbscan(args: &DbscanArgs, seed: Option<u64>) -> Result<(), String> {
    let points = args.shape.generate(false, seed);
    let params = DbscanParams {
        epsilon: args.epsilon,
        min_pts: args.min_pts,
    };
    let mut model = Dbscan::new(points, params, args.metric.shell_metric())?;
    model.start()?;

    let playback = Playback::new(Duration::from_millis(args.delay_ms));
    let outcome = playback.run(&mut model, &StopHandle::new(), |frame, m| {
        if m.phase() == Phase::Expand && m.queued().is_empty() {
            println!("Frame {frame}: cluster {} complete", m.n_clusters());
        }
    })?;

    output::print_journal(model.journal());
    println!(
        "{} clusters and {} noise points after {} steps",
        model.n_clusters(),
        model.noise_count(),
        outcome.frames()
    );

    output::save_json(&model.snapshot(), args.out.as_deref())
}

#[derive(Args, Debug)]
pub struct HierarchicalArgs {
    /// The point cloud to cluster.
    #[arg(long, default_value = "blobs")]
    shape: Shape,

    /// The rule for the distance between clusters.
    #[arg(short('l'), long, default_value = "single")]
    linkage: Linkage,

    /// Merging stops at this many clusters.
    #[arg(short('t'), long, default_value_t = 1)]
    target: usize,

    /// The distance function.
    #[arg(long, default_value = "euclidean")]
    metric: Metric,

    /// Where to write the final snapshot as JSON.
    #[arg(short('o'), long)]
    out: Option<PathBuf>,
}

/// Merges down to the target and prints every merge.
pub fn hierarchical(args: &HierarchicalArgs, seed: Option<u64>) -> Result<(), String> {
    let points = args.shape.generate(true, seed);
    let mut model = Agglomerative::new(points, args.linkage, args.target, args.metric.shell_metric())?;

    while let Some(merge) = model.par_step()? {
        println!(
            "Merged {} and {} into {} at {:.2}, {} clusters left",
            merge.left, merge.right, merge.node, merge.distance, merge.clusters
        );
    }

    let dendrogram = model.dendrogram();
    println!(
        "{} clusters with {} linkage, dendrogram height {:.2}",
        model.n_clusters(),
        model.linkage(),
        dendrogram.max_height
    );

    output::save_json(&model.snapshot(), args.out.as_deref())
}
