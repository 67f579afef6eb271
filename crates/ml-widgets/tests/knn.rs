//! Tests for k-nearest-neighbors classification.

use float_cmp::assert_approx_eq;
use ml_widgets::{
    metric::{Chebyshev, Euclidean, Manhattan},
    supervised::Knn,
    Point,
};
use planegen::{labelled, Canvas};
use rand::prelude::*;
use test_case::test_case;

fn two_pairs() -> Knn<Euclidean> {
    let mut model = Knn::new(3, Euclidean);
    for (x, class) in [(0.0, 0), (1.0, 0), (10.0, 1), (11.0, 1)] {
        model.add(Point::new(x, 0.0), class);
    }
    model
}

#[test]
fn majority_vote() -> Result<(), String> {
    let model = two_pairs();
    let prediction = model.predict(&Point::new(2.0, 0.0))?;

    assert_eq!(prediction.class, 0);
    assert_eq!(prediction.votes, vec![2, 1]);
    let indices = prediction.neighbors.iter().map(|n| n.index).collect::<Vec<_>>();
    assert_eq!(indices, vec![1, 0, 2]);
    assert_approx_eq!(f64, prediction.radius, 8.0);

    let explanation = prediction.explanation();
    assert_eq!(explanation.len(), 1 + 3 + 2 + 1);
    assert_eq!(explanation[0], "The 3 nearest neighbors:");
    assert_eq!(explanation[6], "Class 0 has the most votes (2 of 3).");
    Ok(())
}

#[test]
fn ties() -> Result<(), String> {
    let mut model = two_pairs();
    let midpoint = Point::new(5.5, 0.0);

    // Equal distances keep the lower index.
    model.set_k(1);
    let prediction = model.predict(&midpoint)?;
    assert_eq!(prediction.neighbors[0].index, 1);
    assert_eq!(prediction.class, 0);

    // Equal votes go to the higher class.
    model.set_k(2);
    let prediction = model.predict(&midpoint)?;
    assert_eq!(prediction.votes, vec![1, 1]);
    assert_eq!(prediction.class, 1);
    Ok(())
}

#[test]
fn k_larger_than_data() -> Result<(), String> {
    let mut model = two_pairs();
    model.set_k(10);
    let prediction = model.predict(&Point::new(10.5, 0.0))?;
    assert_eq!(prediction.neighbors.len(), 4);
    assert_eq!(prediction.votes, vec![2, 2]);
    assert_eq!(prediction.class, 1);
    Ok(())
}

#[test]
fn single_class_still_reports_two() -> Result<(), String> {
    let mut model = Knn::new(1, Euclidean);
    model.add(Point::new(0.0, 0.0), 0);
    let prediction = model.predict(&Point::new(1.0, 1.0))?;
    assert_eq!(prediction.votes, vec![1, 0]);
    Ok(())
}

#[test_case(1; "k1")]
#[test_case(3; "k3")]
#[test_case(7; "k7")]
fn parallel_matches_sequential(k: usize) -> Result<(), String> {
    let canvas = Canvas::default();
    let mut rng = StdRng::seed_from_u64(42);
    let (coords, classes) = labelled::two_corners(&canvas, 10, &mut rng);

    let mut model = Knn::new(k, Manhattan);
    for (c, class) in coords.into_iter().zip(classes) {
        model.add(Point::from(c), class);
    }
    for _ in 0..25 {
        let query = Point::from(canvas.random_point(0.0, &mut rng));
        assert_eq!(model.predict(&query)?, model.par_predict(&query)?);
    }
    Ok(())
}

#[test]
fn corners_are_separable() -> Result<(), String> {
    let canvas = Canvas::default();
    let (coords, classes) = labelled::two_corners(&canvas, 5, &mut StdRng::seed_from_u64(1));
    let mut model = Knn::new(3, Chebyshev);
    for (c, class) in coords.into_iter().zip(classes) {
        model.add(Point::from(c), class);
    }

    assert_eq!(model.predict(&Point::new(0.3 * canvas.width, 0.8 * canvas.height))?.class, 0);
    assert_eq!(model.predict(&Point::new(0.7 * canvas.width, 0.2 * canvas.height))?.class, 1);
    Ok(())
}

#[test]
fn errors() {
    let mut model = Knn::new(0, Euclidean);
    model.add(Point::ORIGIN, 0);
    assert!(model.predict(&Point::ORIGIN).is_err());

    model.set_k(1);
    assert!(model.predict(&Point::ORIGIN).is_ok());

    model.clear();
    assert!(model.points().is_empty());
    assert!(model.predict(&Point::ORIGIN).is_err());
    assert!(model.par_predict(&Point::ORIGIN).is_err());
}
