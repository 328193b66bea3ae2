//! Error types for the classifier core and the dataset provider.

/// Errors raised by the classifier core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KnnError {
    /// k is zero or larger than the training set.
    #[error("k must be in 1..={n_train}, got {k}")]
    InvalidK {
        /// The rejected k.
        k: usize,
        /// Number of training images available.
        n_train: usize,
    },

    /// Images and labels do not line up.
    #[error("{images} images but {labels} labels")]
    ShapeMismatch {
        /// Number of images.
        images: usize,
        /// Number of labels.
        labels: usize,
    },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("test set is empty")]
    EmptyTestSet,

    /// A training image has a different pixel count than the query.
    #[error("training image {index} has {found} pixels, expected {expected}")]
    DimensionMismatch {
        /// Position of the offending training image.
        index: usize,
        /// Pixel count of the query.
        expected: usize,
        /// Pixel count of the training image.
        found: usize,
    },
}

/// Errors raised while loading, splitting or corrupting a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row} has no label")]
    MissingLabel { row: usize },

    #[error("row {row}, column {column}: {value:?} is not a pixel value in 0..=255")]
    InvalidPixel {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("row {row} has {found} pixels, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown label {0:?}")]
    UnknownLabel(String),

    #[error("requested {requested} examples but only {available} are available")]
    InsufficientExamples { requested: usize, available: usize },

    /// A probability or fraction fell outside [0, 1].
    #[error("{name} must be in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("sweep step must be >= 1")]
    InvalidStep,

    #[error(transparent)]
    Knn(#[from] KnnError),
}
