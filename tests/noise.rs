//! Classifier robustness to salt-and-pepper noise in the training set.

use approx::assert_abs_diff_eq;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use knn_mnist::sweep::sweep_noise;
use knn_mnist::{LabeledImages, Split};

// Class 0 is bright on the left half, class 1 on the right half
fn two_halves(rng: &mut SmallRng, n: usize) -> LabeledImages {
    (0..n)
        .map(|i| {
            let label = i % 2;
            let image = (0..16)
                .map(|p| {
                    let bright = (p < 8) == (label == 0);
                    let base = if bright { 180 } else { 0 };
                    base + rng.gen_range(0..40_u8)
                })
                .collect();
            (image, label)
        })
        .collect()
}

fn split() -> Split {
    let mut rng = SmallRng::seed_from_u64(99);
    Split {
        train: two_halves(&mut rng, 60),
        test: two_halves(&mut rng, 40),
    }
}

#[test]
fn more_noise_does_not_help_on_average() {
    let points = sweep_noise(&split(), 3, 1.0, &[0.0, 0.5, 1.0], 5, 0).unwrap();
    assert_eq!(points.len(), 3);
    assert!(points.iter().all(|p| (0.0..=1.0).contains(&p.accuracy)));
    assert_abs_diff_eq!(points[0].accuracy, 1.0, epsilon = 1e-12);
    assert!(points[0].accuracy >= points[1].accuracy);
    assert!(points[1].accuracy >= points[2].accuracy);
}

#[test]
fn fully_saturated_training_set_is_a_coin_flip() {
    // Every training image becomes all 255, so every query gets the same
    // neighbors and the same prediction
    let points = sweep_noise(&split(), 3, 1.0, &[1.0], 2, 0).unwrap();
    assert_abs_diff_eq!(points[0].accuracy, 0.5, epsilon = 1e-12);
}

#[test]
fn test_set_is_left_alone() {
    let split = split();
    let before = split.test.clone();
    sweep_noise(&split, 1, 1.0, &[1.0], 1, 0).unwrap();
    assert_eq!(split.test, before);
}
