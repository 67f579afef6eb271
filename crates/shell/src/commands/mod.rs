//! The commands under the `mlw` CLI.

pub mod classification;
pub mod clustering;
pub mod evaluation;
pub mod regression;

use clap::Subcommand;
use ml_widgets::Point;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Step through k-means on random blobs.
    Kmeans(clustering::KMeansArgs),
    /// Step through DBSCAN on a generated shape.
    Dbscan(clustering::DbscanArgs),
    /// Merge clusters bottom-up and print the dendrogram.
    Hierarchical(clustering::HierarchicalArgs),
    /// Classify a query point by its nearest neighbors.
    Knn(classification::KnnArgs),
    /// Train a kernel SVM and sample its decision surface.
    Svm(classification::SvmArgs),
    /// Fit a line by gradient descent.
    Linear(regression::LinearArgs),
    /// Fit a regularized polynomial to a noisy S-curve.
    Poly(regression::PolyArgs),
    /// Run gradient descent on a function of one variable.
    Descent(regression::DescentArgs),
    /// Sweep a threshold over two overlapping normal distributions.
    Roc(evaluation::RocArgs),
    /// Cross-validate k-NN on labelled points.
    Cv(evaluation::CvArgs),
    /// Compare error metrics for a line through a few points.
    Errors(evaluation::ErrorsArgs),
}

/// Runs a command.
pub fn run(command: Commands, seed: Option<u64>) -> Result<(), String> {
    match command {
        Commands::Kmeans(args) => clustering::kmeans(&args, seed),
        Commands::Dbscan(args) => clustering::dbscan(&args, seed),
        Commands::Hierarchical(args) => clustering::hierarchical(&args, seed),
        Commands::Knn(args) => classification::knn(&args, seed),
        Commands::Svm(args) => classification::svm(&args, seed),
        Commands::Linear(args) => regression::linear(&args, seed),
        Commands::Poly(args) => regression::poly(&args, seed),
        Commands::Descent(args) => regression::descent(&args),
        Commands::Roc(args) => evaluation::roc(&args),
        Commands::Cv(args) => evaluation::cv(&args, seed),
        Commands::Errors(args) => evaluation::errors(&args),
    }
}

/// Parses a point written as `X,Y`.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("Expected a point as X,Y, got {s}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("Invalid coordinate {v}: {e}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

/// Builds the random number generator for a seed.
pub fn make_rng(seed: Option<u64>) -> rand::rngs::StdRng {
    use rand::SeedableRng;
    seed.map_or_else(rand::rngs::StdRng::from_entropy, rand::rngs::StdRng::seed_from_u64)
}

/// Converts generated coordinates into points.
pub fn to_points(coords: Vec<[f64; 2]>) -> Vec<Point> {
    coords.into_iter().map(Point::from).collect()
}
