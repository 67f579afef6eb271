//! Tests for agglomerative clustering and the dendrogram layout.

use float_cmp::assert_approx_eq;
use ml_widgets::{
    metric::{Euclidean, Manhattan},
    unsupervised::{hierarchical::Linkage, Agglomerative},
    Point,
};
use test_case::test_case;

mod common;

fn on_line(xs: &[f64]) -> Vec<Point> {
    xs.iter().map(|&x| Point::new(x, 0.0)).collect()
}

#[test_case(Linkage::Single, 2.0, 4.0; "single")]
#[test_case(Linkage::Complete, 3.0, 7.0; "complete")]
#[test_case(Linkage::Average, 2.5, 17.0 / 3.0; "average")]
#[test_case(Linkage::Centroid, 2.5, 17.0 / 3.0; "centroid")]
fn merges_on_a_line(linkage: Linkage, second: f64, third: f64) -> Result<(), String> {
    let mut model = Agglomerative::new(on_line(&[0.0, 1.0, 3.0, 7.0]), linkage, 1, Euclidean)?;

    let merge = model.step()?.ok_or("expected a merge")?;
    assert_eq!((merge.left, merge.right, merge.node, merge.clusters), (0, 1, 4, 3));
    assert_approx_eq!(f64, merge.distance, 1.0);

    let merge = model.step()?.ok_or("expected a merge")?;
    assert_eq!((merge.left, merge.right, merge.node, merge.clusters), (2, 4, 5, 2));
    assert_approx_eq!(f64, merge.distance, second);

    let merge = model.step()?.ok_or("expected a merge")?;
    assert_eq!((merge.left, merge.right, merge.node, merge.clusters), (3, 5, 6, 1));
    assert_approx_eq!(f64, merge.distance, third, epsilon = 1e-12);

    assert!(model.step()?.is_none());
    assert!(model.is_finished());
    assert_eq!(model.nodes()[6].members, vec![3, 2, 0, 1]);
    Ok(())
}

#[test_case(Linkage::Single, 1; "single_to_one")]
#[test_case(Linkage::Complete, 3; "complete_to_three")]
#[test_case(Linkage::Average, 5; "average_to_five")]
#[test_case(Linkage::Centroid, 2; "centroid_to_two")]
fn merge_count(linkage: Linkage, target: usize) -> Result<(), String> {
    let points = common::data_gen::small_blobs(42);
    let n = points.len();
    let mut model = Agglomerative::new(points, linkage, target, Euclidean)?;

    assert_eq!(model.run()?, n - target);
    assert_eq!(model.n_clusters(), target);
    assert_eq!(model.merges(), n - target);
    assert_eq!(model.merge_history().len(), n - target);
    assert!(model.labels().iter().all(|&l| l < target));

    let mut members = model.clusters().flat_map(|c| c.members.clone()).collect::<Vec<_>>();
    members.sort_unstable();
    assert_eq!(members, (0..n).collect::<Vec<_>>());
    Ok(())
}

#[test_case(Linkage::Single; "single")]
#[test_case(Linkage::Complete; "complete")]
#[test_case(Linkage::Average; "average")]
fn heights_never_decrease(linkage: Linkage) -> Result<(), String> {
    for seed in [1, 2, 3] {
        let mut model = Agglomerative::new(common::data_gen::small_blobs(seed), linkage, 1, Euclidean)?;
        model.run()?;
        let heights = model.merge_history().iter().map(|n| n.height).collect::<Vec<_>>();
        assert!(
            heights.windows(2).all(|w| w[0] <= w[1] + 1e-9),
            "{linkage} heights decrease for seed {seed}: {heights:?}"
        );
    }
    Ok(())
}

#[test]
fn separated_groups() -> Result<(), String> {
    let mut model = Agglomerative::new(common::data_gen::three_groups(), Linkage::Single, 3, Manhattan)?;
    model.run()?;

    let labels = model.labels();
    for chunk in labels.chunks(4) {
        assert!(chunk.iter().all(|&l| l == chunk[0]), "{labels:?}");
    }
    assert_ne!(labels[0], labels[4]);
    assert_ne!(labels[4], labels[8]);
    assert_ne!(labels[0], labels[8]);
    Ok(())
}

#[test]
fn first_pair_wins_ties() -> Result<(), String> {
    let square = vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(1.0, 1.0),
    ];
    let mut model = Agglomerative::new(square, Linkage::Single, 1, Euclidean)?;
    let merge = model.step()?.ok_or("expected a merge")?;
    assert_eq!((merge.left, merge.right), (0, 1));
    Ok(())
}

#[test]
fn parallel_matches_sequential() -> Result<(), String> {
    let points = common::data_gen::small_blobs(9);
    let mut seq = Agglomerative::new(points.clone(), Linkage::Average, 1, Euclidean)?;
    let mut par = Agglomerative::new(points, Linkage::Average, 1, Euclidean)?;
    loop {
        let (a, b) = (seq.step()?, par.par_step()?);
        assert_eq!(a, b);
        if a.is_none() {
            break;
        }
    }
    assert_eq!(seq.snapshot(), par.snapshot());
    Ok(())
}

#[test]
fn dendrogram_layout() -> Result<(), String> {
    let mut model = Agglomerative::new(on_line(&[0.0, 1.0, 3.0, 7.0]), Linkage::Single, 1, Euclidean)?;

    let forest = model.dendrogram();
    assert!(forest.joints.is_empty());
    assert_approx_eq!(f64, forest.max_height, 100.0);
    let leaves = forest.leaves.iter().map(|&(i, _)| i).collect::<Vec<_>>();
    assert_eq!(leaves, vec![0, 1, 2, 3]);

    model.run()?;
    let tree = model.dendrogram();
    assert_approx_eq!(f64, tree.max_height, 4.4, epsilon = 1e-12);

    let expected = [(3, 0.0), (2, 1.0 / 3.0), (0, 2.0 / 3.0), (1, 1.0)];
    assert_eq!(tree.leaves.len(), expected.len());
    for (&(i, x), &(ei, ex)) in tree.leaves.iter().zip(&expected) {
        assert_eq!(i, ei);
        assert_approx_eq!(f64, x, ex, epsilon = 1e-12);
    }

    let joints = tree.joints.iter().map(|j| (j.node, j.x)).collect::<Vec<_>>();
    assert_eq!(joints.len(), 3);
    for (&(node, x), &(en, ex)) in joints.iter().zip(&[(4, 5.0 / 6.0), (5, 7.0 / 12.0), (6, 7.0 / 24.0)]) {
        assert_eq!(node, en);
        assert_approx_eq!(f64, x, ex, epsilon = 1e-12);
    }

    let root = tree.joints[2];
    assert_approx_eq!(f64, root.height, 4.0);
    assert_approx_eq!(f64, root.left.1, 0.0);
    assert_approx_eq!(f64, root.right.1, 2.0);
    Ok(())
}

#[test_case(Linkage::Single; "single")]
#[test_case(Linkage::Centroid; "centroid")]
fn duplicate_points_keep_a_positive_axis(linkage: Linkage) -> Result<(), String> {
    let mut model = Agglomerative::new(vec![Point::new(3.0, 3.0); 4], linkage, 1, Euclidean)?;
    model.run()?;

    let tree = model.dendrogram();
    assert_eq!(tree.joints.len(), 3);
    assert!(tree.joints.iter().all(|j| j.height == 0.0));
    assert_approx_eq!(f64, tree.max_height, 100.0);
    assert!(tree.joints.iter().all(|j| (j.height / tree.max_height).is_finite()));
    Ok(())
}

#[test]
fn partial_forest_is_sorted_by_centroid() -> Result<(), String> {
    let points = on_line(&[10.0, 11.0, 0.0, 1.0, 5.0]);
    let mut model = Agglomerative::new(points, Linkage::Single, 3, Euclidean)?;
    model.run()?;

    let order = model.dendrogram().leaves.iter().map(|&(i, _)| i).collect::<Vec<_>>();
    assert_eq!(order, vec![2, 3, 4, 0, 1]);
    Ok(())
}

#[test]
fn editing() -> Result<(), String> {
    assert!(Agglomerative::new(Vec::new(), Linkage::Single, 0, Euclidean).is_err());

    let mut model = Agglomerative::new(Vec::new(), Linkage::Single, 1, Euclidean)?;
    assert!(model.step().is_err());

    for x in [0.0, 1.0, 5.0] {
        model.add_point(Point::new(x, 0.0));
    }
    model.step()?;
    assert_eq!(model.n_clusters(), 2);
    assert_eq!(model.journal().entries()[0].title, "Start");
    assert_eq!(model.journal().len(), 2);

    model.add_point(Point::new(9.0, 0.0));
    assert_eq!(model.n_clusters(), 4);
    assert!(model.journal().is_empty());

    model.step()?;
    model.set_linkage(Linkage::Complete);
    assert_eq!(model.n_clusters(), 4);
    assert_eq!(model.linkage(), Linkage::Complete);

    model.run()?;
    model.set_target(3)?;
    assert_eq!(model.n_clusters(), 1);
    assert!(model.set_target(0).is_err());
    assert_eq!(model.target(), 3);

    model.clear();
    assert!(model.points().is_empty());
    Ok(())
}

#[test_case("single", Linkage::Single)]
#[test_case("Complete", Linkage::Complete)]
#[test_case("AVERAGE", Linkage::Average)]
#[test_case("centroid", Linkage::Centroid)]
fn linkage_names(name: &str, linkage: Linkage) -> Result<(), String> {
    assert_eq!(name.parse::<Linkage>()?, linkage);
    assert_eq!(linkage.to_string().parse::<Linkage>()?, linkage);
    assert!("ward".parse::<Linkage>().is_err());
    Ok(())
}
