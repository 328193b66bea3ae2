use tracing::debug;

use super::{majority_vote, nearest_neighbors};
use crate::error::KnnError;

fn check_shape<I>(images: &[I], labels: &[usize]) -> Result<(), KnnError> {
    if images.len() != labels.len() {
        return Err(KnnError::ShapeMismatch {
            images: images.len(),
            labels: labels.len(),
        });
    }
    Ok(())
}

// Vote among the k nearest neighbors, shapes already checked
fn predict<I: AsRef<[u8]>>(
    train_images: &[I],
    train_labels: &[usize],
    query: &[u8],
    k: usize,
) -> Result<usize, KnnError> {
    let neighbors = nearest_neighbors(train_images, query, k)?;
    // Never empty: nearest_neighbors returns at least one neighbor
    majority_vote(neighbors.iter().map(|n| train_labels[n.index]))
        .ok_or(KnnError::EmptyTrainingSet)
}

/// Classifies one query image by majority vote of its `k` nearest training
/// images. Ties go to the lowest label.
pub fn classify<I: AsRef<[u8]>>(
    train_images: &[I],
    train_labels: &[usize],
    query: &[u8],
    k: usize,
) -> Result<usize, KnnError> {
    check_shape(train_images, train_labels)?;
    predict(train_images, train_labels, query, k)
}

/// Classifies every test image against the whole training set and returns
/// the fraction predicted correctly.
///
/// Per-sample predictions are logged at `debug` level.
pub fn evaluate<I: AsRef<[u8]>, Q: AsRef<[u8]>>(
    train_images: &[I],
    train_labels: &[usize],
    test_images: &[Q],
    test_labels: &[usize],
    k: usize,
) -> Result<f64, KnnError> {
    check_shape(train_images, train_labels)?;
    check_shape(test_images, test_labels)?;
    if test_images.is_empty() {
        return Err(KnnError::EmptyTestSet);
    }

    let mut correct = 0_usize;
    for (sample, (image, &actual)) in test_images.iter().zip(test_labels).enumerate() {
        let prediction = predict(train_images, train_labels, image.as_ref(), k)?;
        debug!(sample, prediction, actual, "classified");
        if prediction == actual {
            correct += 1;
        }
    }
    Ok(correct as f64 / test_images.len() as f64)
}
