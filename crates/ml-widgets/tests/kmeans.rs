//! Tests for step-wise k-means.

use float_cmp::assert_approx_eq;
use ml_widgets::{
    unsupervised::{
        kmeans::{KMeansParams, KMeansPhase},
        KMeans,
    },
    Point, Stepper,
};
use test_case::test_case;

mod common;

fn params(k: usize, seed: u64) -> KMeansParams {
    KMeansParams {
        k,
        seed: Some(seed),
        ..KMeansParams::default()
    }
}

#[test]
fn phases() -> Result<(), String> {
    let mut model = KMeans::new(common::data_gen::three_groups(), params(3, 42))?;
    assert_eq!(model.phase(), KMeansPhase::Idle);
    assert!(!model.is_running());

    model.start()?;
    assert_eq!(model.phase(), KMeansPhase::Initialized);
    assert_eq!(model.centroids().len(), 3);
    assert!(model.assignments().iter().all(Option::is_none));
    assert!(model.is_running());

    assert_eq!(model.step()?, KMeansPhase::Assigned);
    assert!(model.assignments().iter().all(Option::is_some));
    assert_eq!(model.iteration(), 0);

    let phase = model.step()?;
    assert!(matches!(phase, KMeansPhase::Updated | KMeansPhase::Converged));
    assert_eq!(model.iteration(), 1);
    assert_eq!(model.previous_centroids().len(), 3);
    Ok(())
}

#[test]
fn initial_centroids_are_distinct_points() -> Result<(), String> {
    let points = common::data_gen::kmeans_blobs(5);
    let mut model = KMeans::new(points.clone(), params(4, 5))?;
    model.start()?;

    let centroids = model.centroids();
    assert!(centroids.iter().all(|c| points.contains(c)));
    for (i, a) in centroids.iter().enumerate() {
        assert!(centroids[i + 1..].iter().all(|b| a != b));
    }
    Ok(())
}

#[test_case(2, 1; "two_seed_1")]
#[test_case(3, 2; "three_seed_2")]
#[test_case(4, 3; "four_seed_3")]
fn inertia_never_increases(k: usize, seed: u64) -> Result<(), String> {
    let mut model = KMeans::new(common::data_gen::kmeans_blobs(seed), params(k, seed))?;
    model.start()?;
    model.step()?;

    let mut inertia = model.inertia();
    while !Stepper::is_finished(&model) {
        model.step()?;
        let next = model.inertia();
        assert!(next <= inertia + 1e-9, "inertia rose from {inertia} to {next}");
        inertia = next;
    }
    let sizes = model.cluster_sizes();
    assert_eq!(sizes.iter().sum::<usize>(), model.points().len());
    Ok(())
}

#[test]
fn one_cluster_is_the_mean() -> Result<(), String> {
    let points = common::data_gen::three_groups();
    let mean = Point::mean(&points).ok_or("no points")?;
    let mut model = KMeans::new(points, params(1, 0))?;
    model.run()?;

    assert_eq!(model.phase(), KMeansPhase::Converged);
    let [c] = model.centroids() else {
        return Err("expected one centroid".to_string());
    };
    assert_approx_eq!(f64, c.x, mean.x, epsilon = 1e-9);
    assert_approx_eq!(f64, c.y, mean.y, epsilon = 1e-9);
    assert_eq!(model.cluster_sizes(), vec![12]);
    Ok(())
}

#[test]
fn one_cluster_per_point() -> Result<(), String> {
    let points = common::data_gen::three_groups();
    let mut model = KMeans::new(points, params(12, 8))?;
    model.run()?;
    assert_approx_eq!(f64, model.inertia(), 0.0);
    assert!(model.cluster_sizes().iter().all(|&s| s == 1));
    Ok(())
}

#[test]
fn iteration_cap() -> Result<(), String> {
    let p = KMeansParams {
        max_iterations: 1,
        threshold: 0.0,
        ..params(3, 1)
    };
    let mut model = KMeans::new(common::data_gen::kmeans_blobs(1), p)?;
    assert_eq!(model.run()?, 2);
    assert_eq!(model.iteration(), 1);
    assert_eq!(model.phase(), KMeansPhase::Converged);
    Ok(())
}

#[test]
fn seeded_runs_agree() -> Result<(), String> {
    let points = common::data_gen::kmeans_blobs(17);
    let mut a = KMeans::new(points.clone(), params(3, 17))?;
    let mut b = KMeans::new(points, params(3, 17))?;
    assert_eq!(a.run()?, b.run()?);
    assert_eq!(a.snapshot(), b.snapshot());
    Ok(())
}

#[test]
fn journal_detail() -> Result<(), String> {
    let verbose = KMeansParams {
        verbose: true,
        ..params(3, 4)
    };
    let mut model = KMeans::new(common::data_gen::three_groups(), verbose)?;
    model.start()?;
    model.step()?;

    let entry = model.journal().latest().ok_or("empty journal")?;
    assert_eq!(entry.title, "Assignment (iteration 1)");
    for i in 1..=12 {
        let prefix = format!("P{i} ");
        assert!(entry.lines.iter().any(|l| l.starts_with(&prefix)), "missing {prefix}");
    }

    let mut model = KMeans::new(common::data_gen::kmeans_blobs(4), params(3, 4))?;
    model.start()?;
    model.step()?;
    let entry = model.journal().latest().ok_or("empty journal")?;
    assert!(entry.lines.iter().any(|l| l.starts_with("P1 ")));
    assert!(!entry.lines.iter().any(|l| l.starts_with("P2 ")));
    assert!(entry.lines.last().is_some_and(|l| l.starts_with("...and so on")));
    Ok(())
}

#[test]
fn errors() -> Result<(), String> {
    assert!(KMeans::new(Vec::new(), params(0, 0)).is_err());
    let bad = KMeansParams {
        max_iterations: 0,
        ..KMeansParams::default()
    };
    assert!(KMeans::new(Vec::new(), bad).is_err());
    let bad = KMeansParams {
        threshold: -1.0,
        ..KMeansParams::default()
    };
    assert!(KMeans::new(Vec::new(), bad).is_err());

    let mut model = KMeans::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)], params(3, 0))?;
    assert!(model.step().is_err());
    assert_eq!(
        model.start(),
        Err("At least 3 points are needed for 3 clusters".to_string())
    );

    model.add_point(Point::new(5.0, 5.0))?;
    model.start()?;
    assert!(model.add_point(Point::new(6.0, 6.0)).is_err());

    model.run()?;
    assert_eq!(model.add_point(Point::new(6.0, 6.0))?, 3);

    model.set_params(params(2, 0))?;
    assert_eq!(model.phase(), KMeansPhase::Idle);
    assert!(model.centroids().is_empty());

    model.clear();
    assert!(model.points().is_empty());
    Ok(())
}
