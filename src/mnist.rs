use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::DataError;
use crate::Image;

// Load MNIST images from a csv file.
// Returns a tuple of (images, labels)
// The expected format is:
// - No headers
// - One image per row
// - Each row starts with the class label
// - The rest of the row consists of 28x28 pixel values
// - The pixel values are represented as integers, 0-255
// Labels are kept as the raw strings; encoding them is the dataset's job.
pub fn load_mnist(
    path: impl AsRef<Path>,
    n_examples: usize,
) -> Result<(Vec<Image>, Vec<String>), DataError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening mnist csv");
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_mnist(io::BufReader::new(file), n_examples)
}

// Same as load_mnist, from any reader
pub fn read_mnist(
    reader: impl io::Read,
    n_examples: usize,
) -> Result<(Vec<Image>, Vec<String>), DataError> {
    // Flexible so that ragged rows get our own error instead of the csv crate's
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    // We use parallel arrays to store the data for easy handling later on
    let mut images: Vec<Image> = Vec::new();
    let mut labels = Vec::new();
    for (row, result) in reader.records().take(n_examples).enumerate() {
        let record = result?;
        let label = match record.get(0).map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => return Err(DataError::MissingLabel { row }),
        };
        let image = record
            .iter()
            .enumerate()
            .skip(1) // Skip the label
            .map(|(column, value)| {
                value.trim().parse::<u8>().map_err(|_| DataError::InvalidPixel {
                    row,
                    column,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Image, _>>()?;

        // Every image must match the first one
        if let Some(first) = images.first() {
            let expected = first.len();
            if image.len() != expected {
                return Err(DataError::RaggedRow {
                    row,
                    expected,
                    found: image.len(),
                });
            }
        }

        images.push(image);
        labels.push(label);
    }
    Ok((images, labels))
}
