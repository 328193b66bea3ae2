pub mod dataset;
pub mod error;
pub mod knn;
pub mod mnist;
pub mod noise;
pub mod report;
pub mod sweep;

pub use dataset::{load_corpus, LabelEncoder, LabeledImages, Split};
pub use error::{DataError, KnnError};
pub use knn::{classify, evaluate};

// A flattened grayscale image, one byte per pixel
pub type Image = Vec<u8>;
