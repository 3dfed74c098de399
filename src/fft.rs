//! Square 2-D discrete Fourier transforms on top of `rustfft`.
//!
//! Transforms run a 1-D pass over every row, transpose, run the same pass
//! over the former columns and transpose back. Buffers are row-major
//! `size x size` slices of `Complex<f64>`.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Planned forward and inverse transforms for one square size.
#[derive(Clone)]
pub struct Fft2d {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl Fft2d {
    /// Plans transforms for `size x size` buffers.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }

    /// Returns the side length this plan was built for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Unnormalized forward transform, in place.
    pub fn forward(&self, data: &mut [Complex<f64>]) {
        self.run(&*self.forward, data);
    }

    /// Inverse transform scaled by `1 / size^2`, in place.
    pub fn inverse(&self, data: &mut [Complex<f64>]) {
        self.run(&*self.inverse, data);
        let scale = 1.0 / (self.size * self.size) as f64;
        for value in data.iter_mut() {
            *value *= scale;
        }
    }

    fn run(&self, fft: &dyn Fft<f64>, data: &mut [Complex<f64>]) {
        debug_assert_eq!(data.len(), self.size * self.size);
        let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        // rustfft processes every `size`-long chunk of the buffer.
        fft.process_with_scratch(data, &mut scratch);
        transpose_square(data, self.size);
        fft.process_with_scratch(data, &mut scratch);
        transpose_square(data, self.size);
    }
}

fn transpose_square<T>(data: &mut [T], n: usize) {
    for row in 0..n {
        for col in row + 1..n {
            data.swap(row * n + col, col * n + row);
        }
    }
}

/// Moves the zero-displacement sample of a square surface to `(n / 2, n / 2)`.
///
/// Element `(r, c)` lands at `((r + n / 2) % n, (c + n / 2) % n)`.
pub fn fftshift_2d<T: Copy>(data: &[T], n: usize) -> Vec<T> {
    debug_assert_eq!(data.len(), n * n);
    let half = n / 2;
    let mut out = data.to_vec();
    for row in 0..n {
        let dst_row = (row + half) % n;
        for col in 0..n {
            let dst_col = (col + half) % n;
            out[dst_row * n + dst_col] = data[row * n + col];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{fftshift_2d, Fft2d};
    use rustfft::num_complex::Complex;

    #[test]
    fn forward_of_impulse_is_flat() {
        let n = 6;
        let mut data = vec![Complex::new(0.0, 0.0); n * n];
        data[0] = Complex::new(1.0, 0.0);
        Fft2d::new(n).forward(&mut data);
        for value in &data {
            assert!((value.re - 1.0).abs() < 1e-12);
            assert!(value.im.abs() < 1e-12);
        }
    }

    #[test]
    fn inverse_undoes_forward() {
        let n = 5;
        let original: Vec<Complex<f64>> = (0..n * n)
            .map(|i| Complex::new((i * 7 % 11) as f64, 0.0))
            .collect();
        let plan = Fft2d::new(n);
        let mut data = original.clone();
        plan.forward(&mut data);
        plan.inverse(&mut data);
        for (a, b) in data.iter().zip(original.iter()) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn forward_handles_separable_frequency() {
        // exp(2 pi i k x / n) along x concentrates in bin (0, k).
        let n = 8;
        let k = 3;
        let plan = Fft2d::new(n);
        let mut data: Vec<Complex<f64>> = (0..n * n)
            .map(|i| {
                let x = (i % n) as f64;
                Complex::from_polar(1.0, 2.0 * std::f64::consts::PI * k as f64 * x / n as f64)
            })
            .collect();
        plan.forward(&mut data);
        let peak = data
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .map(|(idx, _)| idx)
            .unwrap();
        assert_eq!(peak, k);
        assert!((data[k].norm() - (n * n) as f64).abs() < 1e-9);
    }

    #[test]
    fn fftshift_moves_origin_to_center() {
        let n = 4;
        let mut data = vec![0; n * n];
        data[0] = 1;
        let shifted = fftshift_2d(&data, n);
        assert_eq!(shifted[2 * n + 2], 1);

        let n = 3;
        let mut data = vec![0; n * n];
        data[0] = 1;
        let shifted = fftshift_2d(&data, n);
        assert_eq!(shifted[n + 1], 1);
    }
}
