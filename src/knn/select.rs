use super::squared_distance;
use crate::error::KnnError;

/// One of the k nearest training images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the image in the training set.
    pub index: usize,
    /// Euclidean distance to the query.
    pub distance: f64,
}

/// Finds the `k` training images closest to `query`, nearest first.
///
/// Selection is a linear-time partial select on `(squared distance, index)`,
/// so equally distant images are taken in training order. Only the selected
/// `k` are sorted.
pub fn nearest_neighbors<I: AsRef<[u8]>>(
    train_images: &[I],
    query: &[u8],
    k: usize,
) -> Result<Vec<Neighbor>, KnnError> {
    if train_images.is_empty() {
        return Err(KnnError::EmptyTrainingSet);
    }
    if k == 0 || k > train_images.len() {
        return Err(KnnError::InvalidK {
            k,
            n_train: train_images.len(),
        });
    }

    let mut distances = train_images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let image = image.as_ref();
            if image.len() != query.len() {
                return Err(KnnError::DimensionMismatch {
                    index,
                    expected: query.len(),
                    found: image.len(),
                });
            }
            Ok((squared_distance(image, query), index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Everything before position k - 1 is no further away than what lands there
    distances.select_nth_unstable(k - 1);
    distances.truncate(k);
    distances.sort_unstable();

    Ok(distances
        .into_iter()
        .map(|(d2, index)| Neighbor {
            index,
            distance: (d2 as f64).sqrt(),
        })
        .collect())
}
