//! Tests for the kernel SVM.

use float_cmp::assert_approx_eq;
use ml_widgets::{
    contour::Side,
    playback::{Outcome, Playback, StopHandle},
    supervised::{
        svm::{Class, Kernel, SvmParams},
        Svm,
    },
    Point, Stepper,
};
use planegen::labelled;
use rand::prelude::*;
use test_case::test_case;

fn params(kernel: Kernel, seed: u64) -> SvmParams {
    SvmParams {
        kernel,
        seed: Some(seed),
        ..SvmParams::default()
    }
}

fn load(model: &mut Svm, (coords, labels): (Vec<[f64; 2]>, Vec<i8>)) {
    for (c, label) in coords.into_iter().zip(labels) {
        let class = if label > 0 { Class::Positive } else { Class::Negative };
        model.add_point(Point::from(c), class);
    }
}

fn squares(seed: u64) -> (Vec<[f64; 2]>, Vec<i8>) {
    labelled::separable_squares(10, &mut StdRng::seed_from_u64(seed))
}

#[test_case(Kernel::Linear, 11.0; "linear")]
#[test_case(Kernel::Polynomial { degree: 2 }, 144.0; "polynomial")]
#[test_case(Kernel::Rbf { gamma: 0.5 }, (-4.0f64).exp(); "rbf")]
fn kernels(kernel: Kernel, expected: f64) {
    let (u, v) = (Point::new(1.0, 2.0), Point::new(3.0, 4.0));
    assert_approx_eq!(f64, kernel.eval(&u, &v), expected);
    assert_approx_eq!(f64, kernel.eval(&u, &v), kernel.eval(&v, &u));
}

#[test]
fn kernel_names() {
    assert_eq!(Kernel::default(), Kernel::Rbf { gamma: 0.5 });
    assert_eq!(Kernel::Linear.name(), "linear");
    assert_eq!(Kernel::Polynomial { degree: 3 }.name(), "poly");
    assert_eq!(Kernel::Polynomial { degree: 3 }.to_string(), "poly(degree = 3)");
    assert_eq!(Kernel::Rbf { gamma: 2.0 }.to_string(), "rbf(gamma = 2)");
}

#[test]
fn separates_squares() -> Result<(), String> {
    let mut model = Svm::new(SvmParams {
        learning_rate: 0.05,
        ..params(Kernel::Linear, 42)
    })?;
    load(&mut model, squares(42));
    let steps = model.train();

    assert!(steps > 0);
    assert!(model.is_finished());
    assert!(model.training_accuracy() >= 0.95, "accuracy {}", model.training_accuracy());
    assert!(!model.support_vectors().is_empty());

    // Every support vector pulls the normal towards the positive corner.
    let w = model.weights().ok_or("linear models have weights")?;
    assert!(w.x > 0.0 && w.y > 0.0, "w = {w:?}");
    assert_eq!(model.classify(&Point::new(0.8, 0.8)), Class::Positive);
    assert_eq!(model.classify(&Point::new(-0.8, -0.8)), Class::Negative);
    Ok(())
}

#[test_case(Kernel::Linear; "linear")]
#[test_case(Kernel::Polynomial { degree: 3 }; "polynomial")]
#[test_case(Kernel::Rbf { gamma: 4.0 }; "rbf")]
fn dual_weights_stay_in_the_box(kernel: Kernel) -> Result<(), String> {
    let c = 0.5;
    let mut model = Svm::new(SvmParams {
        c,
        learning_rate: 0.1,
        max_epochs: 200,
        ..params(kernel, 3)
    })?;
    load(&mut model, labelled::centered_disc(30, &mut StdRng::seed_from_u64(3)));
    while !model.is_finished() {
        model.train_step();
        assert!(model.alphas().iter().all(|&a| (0.0..=c).contains(&a)));
    }
    for i in model.support_vectors() {
        assert!(model.alphas()[i] > 0.0);
    }
    Ok(())
}

#[test]
fn seeded_training_is_repeatable() -> Result<(), String> {
    let p = SvmParams {
        max_epochs: 100,
        ..params(Kernel::Rbf { gamma: 2.0 }, 9)
    };
    let mut a = Svm::new(p)?;
    let mut b = Svm::new(p)?;
    load(&mut a, labelled::parabola_split(30, &mut StdRng::seed_from_u64(9)));
    load(&mut b, labelled::parabola_split(30, &mut StdRng::seed_from_u64(9)));
    a.train();
    b.train();
    assert_eq!(a.alphas(), b.alphas());
    assert_approx_eq!(f64, a.bias(), b.bias());

    // Resetting reseeds the sampler.
    let alphas = a.alphas().to_vec();
    a.reset_model();
    assert!(a.alphas().iter().all(|&x| x == 0.0));
    assert_eq!(a.epoch(), 0);
    a.train();
    assert_eq!(a.alphas(), alphas.as_slice());
    Ok(())
}

#[test]
fn stopping_rules() -> Result<(), String> {
    let mut capped = Svm::new(SvmParams {
        max_epochs: 5,
        ..params(Kernel::Linear, 0)
    })?;
    load(&mut capped, squares(0));
    assert_eq!(capped.train(), 5);
    assert_eq!(capped.epoch(), 5);

    // Steps this small never count as progress.
    let mut stalled = Svm::new(SvmParams {
        learning_rate: 1e-7,
        patience: 3,
        ..params(Kernel::Linear, 0)
    })?;
    load(&mut stalled, squares(0));
    assert_eq!(stalled.train(), 4);
    assert!(stalled.is_finished());

    stalled.resume();
    assert!(!stalled.is_finished());
    assert_eq!(stalled.train(), 4);
    assert_eq!(stalled.epoch(), 8);
    Ok(())
}

#[test]
fn untrained() -> Result<(), String> {
    let mut model = Svm::new(params(Kernel::Linear, 1))?;
    assert_eq!(model.train_step(), 0);
    assert_eq!(model.train(), 0);
    assert!(model.advance().is_err());
    assert_approx_eq!(f64, model.training_accuracy(), 0.0);

    // A decision value of zero is positive.
    model.add_point(Point::new(0.5, 0.5), Class::Negative);
    assert_approx_eq!(f64, model.decision(&Point::ORIGIN), 0.0);
    assert_eq!(model.classify(&Point::ORIGIN), Class::Positive);
    assert_approx_eq!(f64, model.training_accuracy(), 0.0);
    assert_eq!(model.weights(), Some(Point::ORIGIN));

    model.set_kernel(Kernel::Polynomial { degree: 2 })?;
    assert!(model.weights().is_none());

    model.clear();
    assert!(model.points().is_empty());
    assert!(model.classes().is_empty());
    Ok(())
}

#[test]
fn invalid_params() -> Result<(), String> {
    let bad = [
        SvmParams {
            c: 0.0,
            ..SvmParams::default()
        },
        SvmParams {
            learning_rate: -0.1,
            ..SvmParams::default()
        },
        SvmParams {
            kernel: Kernel::Rbf { gamma: -1.0 },
            ..SvmParams::default()
        },
        SvmParams {
            c: f64::NAN,
            ..SvmParams::default()
        },
    ];
    for p in bad {
        assert!(Svm::new(p).is_err(), "{p:?}");
    }

    let mut model = Svm::new(SvmParams::default())?;
    assert!(model.set_params(bad[0]).is_err());
    assert_approx_eq!(f64, model.params().c, 1.0);

    assert!(model.set_kernel(Kernel::Rbf { gamma: -1.0 }).is_err());
    assert!(model.set_kernel(Kernel::Rbf { gamma: f64::NAN }).is_err());
    assert_eq!(model.params().kernel, Kernel::default());
    model.set_kernel(Kernel::Linear)?;
    assert_eq!(model.params().kernel, Kernel::Linear);
    Ok(())
}

#[test]
fn surface() -> Result<(), String> {
    let mut model = Svm::new(SvmParams {
        learning_rate: 0.05,
        ..params(Kernel::Linear, 5)
    })?;
    load(&mut model, squares(5));
    assert!(model.surface(0).is_err());

    model.train();
    let surface = model.surface(20)?;
    assert_eq!(surface.resolution, 20);
    assert_eq!(surface.tint.len(), 400);
    assert!(!surface.boundary.is_empty());

    // Cells are tinted by their top-left corner, row by row from the top.
    assert_eq!(surface.tint[19], Some(Side::Positive));
    assert_eq!(surface.tint[380], Some(Side::Negative));
    Ok(())
}

#[test]
fn playback() -> Result<(), String> {
    let mut model = Svm::new(params(Kernel::default(), 2))?;
    load(&mut model, labelled::centered_disc(20, &mut StdRng::seed_from_u64(2)));

    let mut epochs = Vec::new();
    let outcome = Playback::immediate()
        .with_max_frames(3)
        .run(&mut model, &StopHandle::new(), |_, m| epochs.push(m.epoch()))?;
    assert_eq!(outcome, Outcome::FrameLimit { frames: 3 });
    assert_eq!(epochs, vec![1, 2, 3]);
    Ok(())
}
