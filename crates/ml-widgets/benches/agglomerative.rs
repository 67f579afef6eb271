//! Benchmarks for agglomerative clustering, sequential against parallel.

use criterion::*;
use rand::prelude::*;

use ml_widgets::{
    metric::Euclidean,
    unsupervised::{hierarchical::Linkage, Agglomerative},
    Point,
};
use planegen::{clusters, Canvas};

fn agglomerative(c: &mut Criterion) {
    let canvas = Canvas::default();
    let linkages = [Linkage::Single, Linkage::Complete, Linkage::Average, Linkage::Centroid];

    for n in [50, 100] {
        let params = clusters::BlobParams {
            n,
            noise_fraction: 0.0,
            ..clusters::BlobParams::default()
        };
        let points = clusters::blobs(&canvas, &params, &mut StdRng::seed_from_u64(42))
            .into_iter()
            .map(Point::from)
            .collect::<Vec<_>>();

        let mut group = c.benchmark_group(format!("agglomerative-{n}"));
        group.significance_level(0.05).sample_size(10);

        for linkage in linkages {
            let Ok(model) = Agglomerative::new(points.clone(), linkage, 1, Euclidean) else {
                continue;
            };

            let id = BenchmarkId::new("Step", linkage);
            group.bench_with_input(id, &model, |b, model| {
                b.iter_batched(
                    || model.clone(),
                    |mut m| while let Ok(Some(_)) = m.step() {},
                    BatchSize::SmallInput,
                );
            });

            let id = BenchmarkId::new("ParStep", linkage);
            group.bench_with_input(id, &model, |b, model| {
                b.iter_batched(
                    || model.clone(),
                    |mut m| while let Ok(Some(_)) = m.par_step() {},
                    BatchSize::SmallInput,
                );
            });
        }

        group.finish();
    }
}

criterion_group!(benches, agglomerative);
criterion_main!(benches);
