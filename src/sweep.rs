use std::time::Instant;

use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::Split;
use crate::error::{DataError, KnnError};
use crate::knn::evaluate;
use crate::noise::inject_noise;

/// Accuracy measured at one value of the swept parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint<P> {
    pub parameter: P,
    pub accuracy: f64,
}

/// Accuracy on the full training set for every k in `1..=max_k`.
///
/// `max_k` is capped at the training set size.
pub fn sweep_k(split: &Split, max_k: usize) -> Result<Vec<SweepPoint<usize>>, KnnError> {
    let n_train = split.train.len();
    if max_k > n_train {
        warn!(max_k, n_train, "max k exceeds the training set, capping");
    }

    (1..=max_k.min(n_train))
        .map(|k| {
            let now = Instant::now();
            let accuracy = evaluate(
                split.train.images(),
                split.train.labels(),
                split.test.images(),
                split.test.labels(),
                k,
            )?;
            info!("k = {} accuracy = {} [{}ms]", k, accuracy, now.elapsed().as_millis());
            Ok(SweepPoint {
                parameter: k,
                accuracy,
            })
        })
        .collect()
}

/// Accuracy with a fixed `k`, training on the first n examples for
/// n = step, 2 * step, ... up to `max_n`.
///
/// `max_n` is capped at the training set size and sizes below k are skipped.
pub fn sweep_n(
    split: &Split,
    k: usize,
    max_n: usize,
    step: usize,
) -> Result<Vec<SweepPoint<usize>>, DataError> {
    if step == 0 {
        return Err(DataError::InvalidStep);
    }
    let n_train = split.train.len();
    if max_n > n_train {
        warn!(max_n, n_train, "max n exceeds the training set, capping");
    }

    let mut points = Vec::new();
    for n in (step..=max_n.min(n_train)).step_by(step).filter(|&n| n >= k) {
        let now = Instant::now();
        let (images, labels) = split.train.head(n);
        let accuracy = evaluate(images, labels, split.test.images(), split.test.labels(), k)?;
        info!("n = {} accuracy = {} [{}ms]", n, accuracy, now.elapsed().as_millis());
        points.push(SweepPoint {
            parameter: n,
            accuracy,
        });
    }
    Ok(points)
}

/// Mean accuracy over `repeats` seeded runs for each noise probability.
///
/// Every run corrupts a fresh copy of the training set, seeded with
/// `seed + repeat`, so the same repeat sees the same image choice at every
/// probability. The test set is never corrupted. At least one run is made.
pub fn sweep_noise(
    split: &Split,
    k: usize,
    image_fraction: f64,
    probabilities: &[f64],
    repeats: usize,
    seed: u64,
) -> Result<Vec<SweepPoint<f64>>, DataError> {
    let repeats = repeats.max(1);
    let mut points = Vec::with_capacity(probabilities.len());
    for &probability in probabilities {
        let now = Instant::now();
        let mut total = 0.0;
        for repeat in 0..repeats {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(repeat as u64));
            let mut train = split.train.clone();
            inject_noise(train.images_mut(), image_fraction, probability, &mut rng)?;
            total += evaluate(
                train.images(),
                train.labels(),
                split.test.images(),
                split.test.labels(),
                k,
            )?;
        }
        let accuracy = total / repeats as f64;
        info!(
            "noise = {} mean accuracy = {} over {} runs [{}ms]",
            probability,
            accuracy,
            repeats,
            now.elapsed().as_millis()
        );
        points.push(SweepPoint {
            parameter: probability,
            accuracy,
        });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LabeledImages;

    // Two well separated classes on a line
    fn split() -> Split {
        let train: LabeledImages = (0..20_u8)
            .map(|i| if i % 2 == 0 { (vec![i], 0) } else { (vec![200 + i], 1) })
            .collect();
        let test: LabeledImages = vec![(vec![5], 0), (vec![210], 1)].into_iter().collect();
        Split { train, test }
    }

    #[test]
    fn test_sweep_k_caps_at_train_size() {
        let points = sweep_k(&split(), 50).unwrap();
        assert_eq!(points.len(), 20);
        assert_eq!(points[0].parameter, 1);
        assert_eq!(points[19].parameter, 20);
        assert!(points.iter().all(|p| (0.0..=1.0).contains(&p.accuracy)));
        assert_eq!(points[0].accuracy, 1.0);
    }

    #[test]
    fn test_sweep_n_steps() {
        let points = sweep_n(&split(), 1, 20, 5).unwrap();
        let sizes: Vec<usize> = points.iter().map(|p| p.parameter).collect();
        assert_eq!(sizes, vec![5, 10, 15, 20]);
    }

    #[test]
    fn test_sweep_n_skips_sizes_below_k() {
        let points = sweep_n(&split(), 7, 20, 5).unwrap();
        let sizes: Vec<usize> = points.iter().map(|p| p.parameter).collect();
        assert_eq!(sizes, vec![10, 15, 20]);
    }

    #[test]
    fn test_sweep_n_zero_step() {
        assert!(matches!(sweep_n(&split(), 1, 20, 0), Err(DataError::InvalidStep)));
    }

    #[test]
    fn test_sweep_noise_without_noise_matches_clean() {
        let points = sweep_noise(&split(), 1, 0.5, &[0.0], 2, 0).unwrap();
        assert_eq!(points, vec![SweepPoint { parameter: 0.0, accuracy: 1.0 }]);
    }
}
