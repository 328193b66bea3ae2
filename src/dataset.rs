use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Instant;

use rand::Rng;
use tracing::info;

use crate::error::{DataError, KnnError};
use crate::mnist::load_mnist;
use crate::Image;

/// Maps raw label strings to class ordinals, once, at load time.
///
/// When every raw label is a distinct non-negative integer the ordinal is
/// that integer, so MNIST's `"3"` stays class 3 whichever digits are present.
/// Otherwise ordinals follow the sorted order of the raw labels.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    ordinals: HashMap<String, usize>,
    names: BTreeMap<usize, String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(raw_labels: &[S]) -> Self {
        let distinct: Vec<&str> = raw_labels
            .iter()
            .map(|s| s.as_ref())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        // Numeric labels keep their value, as long as no two collapse together
        let numeric: Option<Vec<usize>> = distinct.iter().map(|s| s.parse().ok()).collect();
        let numeric = numeric.filter(|values| {
            let unique: std::collections::BTreeSet<_> = values.iter().collect();
            unique.len() == values.len()
        });

        let pairs: Vec<(String, usize)> = match numeric {
            Some(values) => distinct
                .iter()
                .zip(values)
                .map(|(s, v)| (s.to_string(), v))
                .collect(),
            None => distinct
                .iter()
                .enumerate()
                .map(|(i, s)| (s.to_string(), i))
                .collect(),
        };

        LabelEncoder {
            names: pairs.iter().map(|(s, v)| (*v, s.clone())).collect(),
            ordinals: pairs.into_iter().collect(),
        }
    }

    pub fn encode(&self, raw: &str) -> Result<usize, DataError> {
        self.ordinals
            .get(raw)
            .copied()
            .ok_or_else(|| DataError::UnknownLabel(raw.to_string()))
    }

    pub fn encode_all<S: AsRef<str>>(&self, raw_labels: &[S]) -> Result<Vec<usize>, DataError> {
        raw_labels.iter().map(|s| self.encode(s.as_ref())).collect()
    }

    pub fn decode(&self, ordinal: usize) -> Option<&str> {
        self.names.get(&ordinal).map(String::as_str)
    }

    // Number of distinct classes
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Images with their class ordinals, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledImages {
    images: Vec<Image>,
    labels: Vec<usize>,
}

impl LabeledImages {
    pub fn new(images: Vec<Image>, labels: Vec<usize>) -> Result<Self, KnnError> {
        if images.len() != labels.len() {
            return Err(KnnError::ShapeMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }
        Ok(LabeledImages { images, labels })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    // Pixels may change, the number of images may not
    pub fn images_mut(&mut self) -> &mut [Image] {
        &mut self.images
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// The first `min(n, len)` examples.
    pub fn head(&self, n: usize) -> (&[Image], &[usize]) {
        let n = n.min(self.len());
        (&self.images[..n], &self.labels[..n])
    }

    // Drop everything past the first n examples
    pub fn truncate(&mut self, n: usize) {
        self.images.truncate(n);
        self.labels.truncate(n);
    }

    /// Keeps only the examples whose label is one of `classes`, in order.
    pub fn filter_classes(&self, classes: &[usize]) -> Self {
        self.images
            .iter()
            .zip(&self.labels)
            .filter(|(_, label)| classes.contains(*label))
            .map(|(image, &label)| (image.clone(), label))
            .collect()
    }

    fn select(&self, indices: &[usize]) -> Self {
        indices
            .iter()
            .map(|&i| (self.images[i].clone(), self.labels[i]))
            .collect()
    }
}

impl FromIterator<(Image, usize)> for LabeledImages {
    fn from_iter<T: IntoIterator<Item = (Image, usize)>>(iter: T) -> Self {
        let (images, labels) = iter.into_iter().unzip();
        LabeledImages { images, labels }
    }
}

/// A disjoint train/test partition of a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: LabeledImages,
    pub test: LabeledImages,
}

impl Split {
    /// Draws `train_size + test_size` distinct examples at random; the first
    /// `train_size` of them form the training set.
    pub fn sample(
        corpus: &LabeledImages,
        train_size: usize,
        test_size: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, DataError> {
        let requested = train_size.checked_add(test_size).unwrap_or(usize::MAX);
        if requested > corpus.len() {
            return Err(DataError::InsufficientExamples {
                requested,
                available: corpus.len(),
            });
        }

        let indices = rand::seq::index::sample(rng, corpus.len(), requested).into_vec();
        let (train, test) = indices.split_at(train_size);
        Ok(Split {
            train: corpus.select(train),
            test: corpus.select(test),
        })
    }

    pub fn filter_classes(&self, classes: &[usize]) -> Self {
        Split {
            train: self.train.filter_classes(classes),
            test: self.test.filter_classes(classes),
        }
    }
}

/// Loads and concatenates several MNIST csv files, then label-encodes them.
pub fn load_corpus<P: AsRef<Path>>(paths: &[P]) -> Result<(LabeledImages, LabelEncoder), DataError> {
    let mut images: Vec<Image> = Vec::new();
    let mut raw_labels = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let now = Instant::now();
        let (file_images, file_labels) = load_mnist(path, usize::MAX)?;
        info!(
            "Loaded {} examples from {} [{}ms]",
            file_images.len(),
            path.display(),
            now.elapsed().as_millis()
        );

        // Files must agree on the image size
        if let (Some(first), Some(next)) = (images.first(), file_images.first()) {
            if first.len() != next.len() {
                return Err(DataError::RaggedRow {
                    row: images.len(),
                    expected: first.len(),
                    found: next.len(),
                });
            }
        }
        images.extend(file_images);
        raw_labels.extend(file_labels);
    }

    let encoder = LabelEncoder::fit(&raw_labels);
    let labels = encoder.encode_all(&raw_labels)?;
    Ok((LabeledImages::new(images, labels)?, encoder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};
    use std::collections::HashSet;

    fn corpus(n: usize) -> LabeledImages {
        // Each image holds its own index so overlap is easy to spot
        (0..n).map(|i| (vec![i as u8], i % 10)).collect()
    }

    #[test]
    fn test_encoder_keeps_digit_values() {
        let encoder = LabelEncoder::fit(&["8", "3", "8"]);
        assert_eq!(encoder.encode("3").unwrap(), 3);
        assert_eq!(encoder.encode("8").unwrap(), 8);
        assert_eq!(encoder.decode(8), Some("8"));
        assert_eq!(encoder.len(), 2);
    }

    #[test]
    fn test_encoder_orders_text_labels() {
        let encoder = LabelEncoder::fit(&["cat", "ant", "bee", "cat"]);
        assert_eq!(encoder.encode_all(&["ant", "bee", "cat"]).unwrap(), vec![0, 1, 2]);
        assert_eq!(encoder.decode(2), Some("cat"));
    }

    #[test]
    fn test_encoder_colliding_numbers_fall_back_to_order() {
        let encoder = LabelEncoder::fit(&["3", "03"]);
        assert_eq!(encoder.encode("03").unwrap(), 0);
        assert_eq!(encoder.encode("3").unwrap(), 1);
    }

    #[test]
    fn test_encoder_unknown_label() {
        let encoder = LabelEncoder::fit(&["1"]);
        assert!(matches!(encoder.encode("7"), Err(DataError::UnknownLabel(l)) if l == "7"));
    }

    #[test]
    fn test_labeled_images_shape() {
        assert_eq!(
            LabeledImages::new(vec![vec![0]; 5], vec![0; 4]),
            Err(KnnError::ShapeMismatch {
                images: 5,
                labels: 4
            })
        );
    }

    #[test]
    fn test_head_clamps() {
        let data = corpus(5);
        assert_eq!(data.head(3).0.len(), 3);
        assert_eq!(data.head(30).1.len(), 5);
    }

    #[test]
    fn test_filter_classes_keeps_alignment() {
        let filtered = corpus(30).filter_classes(&[3, 8]);
        assert_eq!(filtered.len(), 6);
        for (image, &label) in filtered.images().iter().zip(filtered.labels()) {
            assert_eq!(image[0] as usize % 10, label);
        }
    }

    #[test]
    fn test_split_is_disjoint_and_seeded() {
        let data = corpus(100);
        let split = Split::sample(&data, 60, 30, &mut SmallRng::seed_from_u64(0)).unwrap();
        assert_eq!(split.train.len(), 60);
        assert_eq!(split.test.len(), 30);

        let train: HashSet<u8> = split.train.images().iter().map(|i| i[0]).collect();
        assert_eq!(train.len(), 60);
        assert!(split.test.images().iter().all(|i| !train.contains(&i[0])));

        let again = Split::sample(&data, 60, 30, &mut SmallRng::seed_from_u64(0)).unwrap();
        assert_eq!(split, again);
    }

    #[test]
    fn test_split_too_large() {
        assert!(matches!(
            Split::sample(&corpus(10), 8, 3, &mut SmallRng::seed_from_u64(0)),
            Err(DataError::InsufficientExamples {
                requested: 11,
                available: 10
            })
        ));
    }

    #[test]
    fn test_split_sizes_that_overflow() {
        assert!(matches!(
            Split::sample(&corpus(10), usize::MAX, 1, &mut SmallRng::seed_from_u64(0)),
            Err(DataError::InsufficientExamples {
                requested: usize::MAX,
                available: 10
            })
        ));
    }

    #[test]
    fn test_load_corpus_concatenates_files() {
        let dir = std::env::temp_dir().join(format!("knn_mnist_corpus_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("train.csv");
        let second = dir.join("test.csv");
        std::fs::write(&first, "3,0,0\n8,255,255\n").unwrap();
        std::fs::write(&second, "3,1,1\n").unwrap();

        let (corpus, encoder) = load_corpus(&[&first, &second]).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.labels(), &[3, 8, 3]);
        assert_eq!(corpus.images()[2], vec![1, 1]);
        assert_eq!(encoder.decode(8), Some("8"));

        std::fs::write(&second, "3,1,1,1\n").unwrap();
        assert!(matches!(
            load_corpus(&[&first, &second]),
            Err(DataError::RaggedRow { row: 2, .. })
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
