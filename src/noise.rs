use rand::Rng;
use tracing::debug;

use crate::error::DataError;
use crate::Image;

// Saturated pixel value written by salt-and-pepper noise
pub const SALT: u8 = 255;

fn check_unit(name: &'static str, value: f64) -> Result<(), DataError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DataError::InvalidProbability { name, value })
    }
}

// Independently saturate each pixel with the given probability
pub fn salt_pepper(image: &mut [u8], probability: f64, rng: &mut impl Rng) -> Result<(), DataError> {
    check_unit("noise probability", probability)?;
    for pixel in image.iter_mut() {
        if rng.gen_bool(probability) {
            *pixel = SALT;
        }
    }
    Ok(())
}

/// Corrupts a random `image_fraction` of `images` in place.
///
/// The chosen images are distinct. Returns their indices.
pub fn inject_noise(
    images: &mut [Image],
    image_fraction: f64,
    probability: f64,
    rng: &mut impl Rng,
) -> Result<Vec<usize>, DataError> {
    check_unit("image fraction", image_fraction)?;
    check_unit("noise probability", probability)?;

    let amount = ((images.len() as f64) * image_fraction).round() as usize;
    let chosen = rand::seq::index::sample(rng, images.len(), amount.min(images.len())).into_vec();
    for &i in &chosen {
        salt_pepper(&mut images[i], probability, rng)?;
    }
    debug!(images = chosen.len(), probability, "injected salt-and-pepper noise");
    Ok(chosen)
}
