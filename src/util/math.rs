//! Numeric helpers for windowing and position aggregation.

use std::f64::consts::PI;

/// Symmetric Hamming window of length `n`.
///
/// `w[i] = 0.54 - 0.46 cos(2 pi i / (n - 1))`; a single-sample window is `[1.0]`.
pub(crate) fn hamming(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / denom).cos())
        .collect()
}

/// Separable 2-D Hamming window (outer product), row-major `n x n`.
pub(crate) fn hamming_2d(n: usize) -> Vec<f64> {
    let w = hamming(n);
    let mut out = Vec::with_capacity(n * n);
    for &wy in &w {
        for &wx in &w {
            out.push(wy * wx);
        }
    }
    out
}

/// Arithmetic mean; `None` for an empty slice.
pub(crate) fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let len = values.len();
    if len == 0 {
        return None;
    }
    Some(values.sum::<f64>() / len as f64)
}

#[cfg(test)]
mod tests {
    use super::{hamming, hamming_2d, mean};

    #[test]
    fn hamming_matches_known_values() {
        let w = hamming(5);
        let expected = [0.08, 0.54, 1.0, 0.54, 0.08];
        for (value, expected) in w.iter().zip(expected.iter()) {
            assert!((value - expected).abs() < 1e-12);
        }
        assert_eq!(hamming(1), vec![1.0]);
    }

    #[test]
    fn hamming_2d_is_outer_product() {
        let w = hamming(4);
        let w2 = hamming_2d(4);
        assert_eq!(w2.len(), 16);
        assert!((w2[4 + 2] - w[1] * w[2]).abs() < 1e-15);
        assert!((w2[3 * 4] - w[3] * w[0]).abs() < 1e-15);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert!(mean(Vec::<f64>::new().into_iter()).is_none());
        assert_eq!(mean(vec![1.0, 2.0, 6.0].into_iter()), Some(3.0));
    }
}
