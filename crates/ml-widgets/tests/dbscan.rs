//! Tests for the DBSCAN state machine.

use ml_widgets::{
    metric::{Chebyshev, Euclidean, Manhattan},
    playback::{Outcome, Playback, StopHandle},
    unsupervised::dbscan::{Dbscan, DbscanParams, Phase, PointKind},
    Metric, Point,
};
use test_case::test_case;

mod common;

fn line(n: usize) -> Vec<Point> {
    (0..n).map(|i| Point::new(i as f64, 0.0)).collect()
}

#[test]
fn tiny() -> Result<(), String> {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(50.0, 50.0),
    ];
    let params = DbscanParams {
        epsilon: 2.0,
        min_pts: 3,
    };
    let mut dbscan = Dbscan::new(points, params, Euclidean)?;
    dbscan.run()?;

    assert_eq!(dbscan.n_clusters(), 1);
    assert_eq!(dbscan.noise_count(), 1);
    assert_eq!(dbscan.labels(), vec![Some(0), Some(0), Some(0), None]);
    assert_eq!(dbscan.kind_of(3), PointKind::Noise);
    Ok(())
}

#[test]
fn noise_becomes_border() -> Result<(), String> {
    let params = DbscanParams {
        epsilon: 1.0,
        min_pts: 3,
    };
    let mut dbscan = Dbscan::new(line(4), params, Euclidean)?;
    dbscan.start()?;

    // The first point is too sparse on its own.
    assert_eq!(dbscan.step()?, Phase::PickPoint);
    assert_eq!(dbscan.kind_of(0), PointKind::Noise);
    assert_eq!(dbscan.cluster_of(0), None);

    // Its neighbor is dense and claims it.
    assert_eq!(dbscan.step()?, Phase::Expand);
    assert_eq!(dbscan.current(), Some(1));
    assert_eq!(dbscan.current_neighbors(), &[0, 1, 2]);
    assert_eq!(dbscan.kind_of(0), PointKind::Border);
    assert_eq!(dbscan.cluster_of(0), Some(0));
    assert_eq!(dbscan.queued(), vec![2]);

    let latest = dbscan.journal().latest().map(ToString::to_string).unwrap_or_default();
    assert!(latest.contains("previously noise"), "{latest}");

    assert_eq!(dbscan.step()?, Phase::Expand);
    assert_eq!(dbscan.step()?, Phase::Expand);
    assert_eq!(dbscan.step()?, Phase::PickPoint);
    assert_eq!(dbscan.step()?, Phase::Finished);
    assert_eq!(dbscan.step()?, Phase::Finished);

    assert_eq!(
        dbscan.kinds(),
        vec![PointKind::Border, PointKind::Core, PointKind::Core, PointKind::Border]
    );
    assert_eq!(dbscan.noise_count(), 0);
    Ok(())
}

#[test]
fn run_counts_steps() -> Result<(), String> {
    let params = DbscanParams {
        epsilon: 1.0,
        min_pts: 3,
    };
    let mut dbscan = Dbscan::new(line(4), params, Euclidean)?;
    assert_eq!(dbscan.run()?, 6);
    assert_eq!(dbscan.phase(), Phase::Finished);
    Ok(())
}

#[test_case(Box::new(Euclidean); "euclidean")]
#[test_case(Box::new(Manhattan); "manhattan")]
#[test_case(Box::new(Chebyshev); "chebyshev")]
fn separated_groups(metric: Box<dyn Metric>) -> Result<(), String> {
    let mut points = common::data_gen::three_groups();
    points.push(Point::new(300.0, 300.0));
    let params = DbscanParams {
        epsilon: 6.0,
        min_pts: 3,
    };
    let mut dbscan = Dbscan::new(points, params, metric)?;
    dbscan.run()?;

    assert_eq!(dbscan.n_clusters(), 3);
    assert_eq!(dbscan.noise_count(), 1);
    let labels = dbscan.labels();
    for (group, chunk) in labels[..12].chunks(4).enumerate() {
        assert!(chunk.iter().all(|&l| l == Some(group)), "{labels:?}");
    }
    Ok(())
}

#[test_case(42, 30.0, 3; "default")]
#[test_case(7, 15.0, 4; "tight")]
#[test_case(3, 60.0, 2; "loose")]
fn every_point_is_classified(seed: u64, epsilon: f64, min_pts: usize) -> Result<(), String> {
    let params = DbscanParams { epsilon, min_pts };
    let mut dbscan = Dbscan::new(common::data_gen::moons(seed), params, Euclidean)?;
    dbscan.run()?;

    for (i, kind) in dbscan.kinds().into_iter().enumerate() {
        match kind {
            PointKind::Unvisited => return Err(format!("Point {i} was never visited")),
            PointKind::Noise => assert_eq!(dbscan.cluster_of(i), None),
            PointKind::Core | PointKind::Border => assert!(dbscan.cluster_of(i).is_some()),
        }
    }
    let clustered = dbscan.labels().iter().filter(|l| l.is_some()).count();
    assert_eq!(clustered + dbscan.noise_count(), dbscan.points().len());
    Ok(())
}

#[test]
fn assignments_never_change() -> Result<(), String> {
    let mut dbscan = Dbscan::new(common::data_gen::moons(42), DbscanParams::default(), Euclidean)?;
    dbscan.start()?;

    let mut seen = vec![None; dbscan.points().len()];
    while dbscan.step()? != Phase::Finished {
        for (i, label) in dbscan.labels().into_iter().enumerate() {
            if let Some(old) = seen[i] {
                assert_eq!(label, Some(old), "point {i} changed clusters");
            }
            seen[i] = seen[i].or(label);
        }
    }
    Ok(())
}

#[test]
fn deterministic() -> Result<(), String> {
    let points = common::data_gen::moons(11);
    let mut a = Dbscan::new(points.clone(), DbscanParams::default(), Euclidean)?;
    let mut b = Dbscan::new(points, DbscanParams::default(), Euclidean)?;
    assert_eq!(a.run()?, b.run()?);
    assert_eq!(a.snapshot(), b.snapshot());

    // A restart reproduces the same result.
    let first = a.labels();
    a.start()?;
    a.run()?;
    assert_eq!(a.labels(), first);
    Ok(())
}

#[test]
fn errors() -> Result<(), String> {
    let bad = DbscanParams {
        epsilon: 0.0,
        min_pts: 3,
    };
    assert!(Dbscan::new(Vec::new(), bad, Euclidean).is_err());
    let bad = DbscanParams {
        epsilon: 1.0,
        min_pts: 0,
    };
    assert!(Dbscan::new(Vec::new(), bad, Euclidean).is_err());

    let mut dbscan = Dbscan::new(Vec::new(), DbscanParams::default(), Euclidean)?;
    assert!(dbscan.step().is_err());
    assert!(dbscan.start().is_err());

    assert_eq!(dbscan.add_point(Point::new(1.0, 1.0))?, 0);
    dbscan.start()?;
    assert!(dbscan.add_point(Point::new(2.0, 2.0)).is_err());

    dbscan.reset();
    assert_eq!(dbscan.phase(), Phase::Idle);
    assert!(dbscan.journal().is_empty());
    assert_eq!(dbscan.add_point(Point::new(2.0, 2.0))?, 1);

    dbscan.clear();
    assert!(dbscan.points().is_empty());
    Ok(())
}

#[test]
fn playback() -> Result<(), String> {
    let points = common::data_gen::three_groups();
    let params = DbscanParams {
        epsilon: 6.0,
        min_pts: 3,
    };
    let steps = Dbscan::new(points.clone(), params, Euclidean)?.run()?;

    let mut dbscan = Dbscan::new(points, params, Euclidean)?;
    dbscan.start()?;
    let mut frames = Vec::new();
    let outcome = Playback::immediate().run(&mut dbscan, &StopHandle::new(), |frame, d| {
        frames.push((frame, d.phase()));
    })?;

    assert_eq!(outcome, Outcome::Finished { frames: steps });
    assert_eq!(frames.len(), steps);
    assert_eq!(frames.last().map(|&(_, p)| p), Some(Phase::Finished));

    let mut dbscan = Dbscan::new(common::data_gen::three_groups(), params, Euclidean)?;
    dbscan.start()?;
    let stop = StopHandle::new();
    let outcome = Playback::immediate().run(&mut dbscan, &stop, |frame, _| {
        if frame == 3 {
            stop.stop();
        }
    })?;
    assert_eq!(outcome, Outcome::Stopped { frames: 3 });
    Ok(())
}
