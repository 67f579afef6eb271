//! Subcommands for the classification widgets.

use std::path::PathBuf;

use clap::Args;
use ml_widgets::{
    supervised::{
        svm::{Class, Kernel, Surface, SvmParams},
        Knn, Svm,
    },
    Point,
};
use planegen::{labelled, Canvas};
use serde::Serialize;

use super::{make_rng, parse_point, to_points};
use crate::{metrics::Metric, output};

#[derive(Args, Debug)]
pub struct KnnArgs {
    /// The number of neighbors that vote.
    #[arg(short('k'), long, default_value_t = 3)]
    k: usize,

    /// The point to classify, as X,Y in canvas coordinates.
    #[arg(short('q'), long, value_parser = parse_point, allow_hyphen_values = true, default_value = "300,200")]
    query: Point,

    /// The distance function.
    #[arg(long, default_value = "euclidean")]
    metric: Metric,
}

/// Classifies the query against two corner clusters and explains the vote.
pub fn knn(args: &KnnArgs, seed: Option<u64>) -> Result<(), String> {
    let (coords, classes) = labelled::two_corners(&Canvas::default(), 5, &mut make_rng(seed));

    let mut model = Knn::new(args.k, args.metric.shell_metric());
    for (p, c) in to_points(coords).into_iter().zip(classes) {
        model.add(p, c);
    }

    let prediction = model.par_predict(&args.query)?;
    for line in prediction.explanation() {
        println!("{line}");
    }
    ftlog::info!(
        "{} classified as {} within radius {:.2}",
        args.query,
        prediction.class,
        prediction.radius
    );
    Ok(())
}

/// The kernels selectable on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum KernelName {
    Linear,
    Poly,
    Rbf,
}

#[derive(Args, Debug)]
pub struct SvmArgs {
    /// The kernel. Each kernel trains on a data set it can separate.
    #[arg(long, default_value = "rbf")]
    kernel: KernelName,

    /// The upper bound on the dual weights.
    #[arg(short('c'), long, default_value_t = 1.0)]
    c: f64,

    /// The width parameter of the RBF kernel.
    #[arg(short('g'), long, default_value_t = 0.5)]
    gamma: f64,

    /// The degree of the polynomial kernel.
    #[arg(short('d'), long, default_value_t = 2)]
    degree: u32,

    /// The number of cells along each side of the sampled surface.
    #[arg(short('r'), long, default_value_t = 60)]
    resolution: usize,

    /// Where to write the trained model and surface as JSON.
    #[arg(short('o'), long)]
    out: Option<PathBuf>,
}

/// What `mlw svm --out` writes.
#[derive(Serialize)]
struct SvmReport<'a> {
    /// The training parameters.
    params: &'a SvmParams,
    /// The training points.
    points: &'a [Point],
    /// The class of every point.
    classes: &'a [Class],
    /// The dual weights.
    alphas: &'a [f64],
    /// The bias.
    bias: f64,
    /// The indices of the support vectors.
    support_vectors: Vec<usize>,
    /// The sampled decision surface.
    surface: Surface,
}

/// Trains until the dual weights settle and reports the fit.
pub fn svm(args: &SvmArgs, seed: Option<u64>) -> Result<(), String> {
    let mut rng = make_rng(seed);
    let (kernel, (coords, labels)) = match args.kernel {
        KernelName::Linear => (Kernel::Linear, labelled::separable_squares(20, &mut rng)),
        KernelName::Poly => (
            Kernel::Polynomial { degree: args.degree },
            labelled::parabola_split(40, &mut rng),
        ),
        KernelName::Rbf => (Kernel::Rbf { gamma: args.gamma }, labelled::centered_disc(50, &mut rng)),
    };

    let params = SvmParams {
        kernel,
        c: args.c,
        seed,
        ..SvmParams::default()
    };
    let mut model = Svm::new(params)?;
    for (p, label) in to_points(coords).into_iter().zip(labels) {
        let class = if label > 0 { Class::Positive } else { Class::Negative };
        model.add_point(p, class);
    }

    let epochs = model.train();
    let support_vectors = model.support_vectors();
    println!(
        "{kernel} kernel trained for {epochs} epochs: accuracy {:.1}%, {} support vectors, bias {:.3}",
        100.0 * model.training_accuracy(),
        support_vectors.len(),
        model.bias()
    );
    if let Some(w) = model.weights() {
        println!("Weights: {w}");
    }

    let surface = model.surface(args.resolution)?;
    println!(
        "Boundary of {} segments, margins of {} and {}",
        surface.boundary.len(),
        surface.positive_margin.len(),
        surface.negative_margin.len()
    );

    let report = SvmReport {
        params: model.params(),
        points: model.points(),
        classes: model.classes(),
        alphas: model.alphas(),
        bias: model.bias(),
        support_vectors,
        surface,
    };
    output::save_json(&report, args.out.as_deref())
}
