// Squared L2 distance between two images of the same size.
// Pixels are at most 255 apart, so the sum stays exact in a u64.
#[inline]
pub fn squared_distance(a: &[u8], b: &[u8]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x.abs_diff(y) as u64;
            d * d
        })
        .sum()
}

// Plain Euclidean distance, for reporting
pub fn euclidean_distance(a: &[u8], b: &[u8]) -> f64 {
    (squared_distance(a, b) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hand_computed() {
        assert_eq!(squared_distance(&[0, 0], &[1, 1]), 2);
        assert_eq!(squared_distance(&[10, 10], &[1, 1]), 162);
        assert_abs_diff_eq!(euclidean_distance(&[0, 0], &[3, 4]), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetric_and_zero_on_self() {
        let a = [12, 200, 0, 255];
        let b = [255, 0, 40, 1];
        assert_eq!(squared_distance(&a, &b), squared_distance(&b, &a));
        assert_eq!(squared_distance(&a, &a), 0);
    }

    #[test]
    fn test_saturated_full_image_fits() {
        let black = vec![0_u8; 784];
        let white = vec![255_u8; 784];
        assert_eq!(squared_distance(&black, &white), 784 * 255 * 255);
    }
}
