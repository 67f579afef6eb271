//! Subcommands for the model evaluation widgets.

use clap::Args;
use ml_widgets::{
    metric::Euclidean,
    supervised::{
        cross_validate,
        error_metrics::{default_points, evaluate, Line},
        Binormal, KFold, Knn,
    },
    utils, Point,
};
use planegen::labelled;

use super::{make_rng, parse_point, to_points};

#[derive(Args, Debug)]
pub struct RocArgs {
    /// The distance between the means of the two classes.
    #[arg(long, default_value_t = 2.0)]
    separation: f64,

    /// The standard deviation of both classes.
    #[arg(long, default_value_t = 1.0)]
    std: f64,

    /// The decision threshold for the confusion matrix.
    #[arg(short('t'), long, default_value_t = 1.0, allow_hyphen_values = true)]
    threshold: f64,

    /// The population split evenly between the classes.
    #[arg(short('p'), long, default_value_t = 1000)]
    population: usize,
}

/// Prints the confusion matrix at the threshold and the area under the ROC
/// curve.
pub fn roc(args: &RocArgs) -> Result<(), String> {
    let model = Binormal::new(0.0, args.separation, args.std)?;

    let matrix = model.confusion(args.threshold, args.population);
    for line in matrix.explanation() {
        println!("{line}");
    }

    let (fpr, tpr) = model.rates(args.threshold);
    let curve = model.roc_curve(0.1)?;
    println!("At threshold {:.2}: FPR {fpr:.3}, TPR {tpr:.3}", args.threshold);
    println!(
        "AUC {:.4} from {} points on the curve, {:.4} in closed form",
        curve.auc,
        curve.points.len(),
        model.analytic_auc()
    );
    Ok(())
}

#[derive(Args, Debug)]
pub struct CvArgs {
    /// The number of folds.
    #[arg(short('f'), long, default_value_t = 5)]
    folds: usize,

    /// The number of labelled points.
    #[arg(short('n'), long, default_value_t = 50)]
    points: usize,

    /// The number of neighbors that vote.
    #[arg(short('k'), long, default_value_t = 3)]
    k: usize,
}

/// Cross-validates k-NN on points inside and outside a disc.
pub fn cv(args: &CvArgs, seed: Option<u64>) -> Result<(), String> {
    let (coords, labels) = labelled::centered_disc(args.points, &mut make_rng(seed));
    let points = to_points(coords);
    let classes = labels.iter().map(|&l| usize::from(l > 0)).collect::<Vec<_>>();

    let kfold = KFold::new(args.folds, points.len())?;
    let report = cross_validate(&kfold, |train, valid| {
        let mut model = Knn::new(args.k, Euclidean);
        for &i in train {
            model.add(points[i], classes[i]);
        }
        let correct = valid
            .iter()
            .map(|&i| model.predict(&points[i]).map(|p| p.class == classes[i]))
            .collect::<Result<Vec<_>, String>>()?
            .into_iter()
            .filter(|&hit| hit)
            .count();
        Ok(utils::as_f64(correct) / utils::as_f64(valid.len()))
    })?;

    for (i, score) in report.scores.iter().enumerate() {
        println!("Fold {}: accuracy {score:.3}, running mean {:.3}", i + 1, report.running_mean(i + 1));
    }
    println!("Mean accuracy {:.3} ± {:.3}", report.mean, report.std);
    Ok(())
}

#[derive(Args, Debug)]
pub struct ErrorsArgs {
    /// A data point as X,Y. Repeat for more points. Three sample points are
    /// used if none are given.
    #[arg(short('p'), long = "point", value_parser = parse_point, allow_hyphen_values = true)]
    points: Vec<Point>,

    /// The slope of the line.
    #[arg(long, default_value_t = 0.3, allow_hyphen_values = true)]
    slope: f64,

    /// The intercept of the line.
    #[arg(long, default_value_t = 2.5, allow_hyphen_values = true)]
    intercept: f64,
}

/// Prints the residual table and the error summary for the line.
pub fn errors(args: &ErrorsArgs) -> Result<(), String> {
    let points = if args.points.is_empty() {
        default_points()
    } else {
        args.points.clone()
    };
    let line = Line {
        slope: args.slope,
        intercept: args.intercept,
    };
    let report = evaluate(&points, &line)?;

    println!("{:>8} {:>8} {:>8} {:>8} {:>8} {:>8}", "x", "y", "ŷ", "|e|", "e²", "%e");
    for r in &report.rows {
        let percent = r.percent_error.map_or_else(|| "n/a".to_string(), |p| format!("{:.2}", 100.0 * p));
        println!(
            "{:>8.2} {:>8.2} {:>8.2} {:>8.3} {:>8.3} {percent:>8}",
            r.point.x, r.point.y, r.y_line, r.abs_error, r.sq_error
        );
    }
    println!("MAE  {:.4}", report.mae);
    println!("MSE  {:.4}", report.mse);
    println!("RMSE {:.4}", report.rmse);
    match report.mape {
        Some(mape) => println!("MAPE {mape:.2}%"),
        None => println!("MAPE undefined, some y is 0"),
    }
    Ok(())
}
