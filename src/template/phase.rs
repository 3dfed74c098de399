//! Windowed template spectrum for phase correlation.

use crate::fft::{fftshift_2d, Fft2d};
use crate::image::{ImageView, Pixel};
use crate::refine::PeakRefinement;
use crate::template::ensure_square;
use crate::util::math::hamming_2d;
use crate::util::{PhaseMatchError, PhaseMatchResult};
use rustfft::num_complex::Complex;

/// Precomputed Hamming window, FFT plan and template spectrum.
#[derive(Clone)]
pub struct PhasePlan {
    size: usize,
    window: Vec<f64>,
    fft: Fft2d,
    spectrum: Vec<Complex<f64>>,
    refinement: PeakRefinement,
}

impl PhasePlan {
    /// Builds a plan from a square template view.
    pub fn from_view<T: Pixel>(
        tpl: ImageView<'_, T>,
        refinement: PeakRefinement,
    ) -> PhaseMatchResult<Self> {
        let size = tpl.width();
        ensure_square(&tpl, size)?;
        Self::from_samples(&tpl.to_f64(), size, refinement)
    }

    /// Builds a plan from a row-major `size x size` sample buffer.
    pub fn from_samples(
        samples: &[f64],
        size: usize,
        refinement: PeakRefinement,
    ) -> PhaseMatchResult<Self> {
        if size == 0 {
            return Err(PhaseMatchError::InvalidDimensions {
                width: size,
                height: size,
            });
        }
        if samples.len() != size * size {
            return Err(PhaseMatchError::BufferTooSmall {
                needed: size * size,
                got: samples.len(),
            });
        }

        let window = hamming_2d(size);
        let fft = Fft2d::new(size);
        let spectrum = windowed_spectrum(&fft, &window, samples);
        Ok(Self {
            size,
            window,
            fft,
            spectrum,
            refinement,
        })
    }

    /// Returns the patch side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the configured peak refinement.
    pub fn refinement(&self) -> PeakRefinement {
        self.refinement
    }

    /// Correlation surface of the template against `window`.
    ///
    /// The surface is row-major `size x size` with zero displacement at
    /// `(size / 2, size / 2)`.
    pub fn correlation_surface<T: Pixel>(
        &self,
        window: ImageView<'_, T>,
    ) -> PhaseMatchResult<Vec<f64>> {
        ensure_square(&window, self.size)?;
        Ok(self.surface_from_samples(&window.to_f64()))
    }

    pub(crate) fn surface_from_samples(&self, samples: &[f64]) -> Vec<f64> {
        let other = windowed_spectrum(&self.fft, &self.window, samples);

        // The cross-power is elementwise, so both spectra stay in natural
        // order; only the spatial surface is re-centred.
        let mut cross: Vec<Complex<f64>> = self
            .spectrum
            .iter()
            .zip(other.iter())
            .map(|(a, b)| {
                let product = a * b.conj();
                let magnitude = product.norm();
                let denom = if magnitude == 0.0 { 1.0 } else { magnitude };
                product / denom
            })
            .collect();
        self.fft.inverse(&mut cross);

        let real: Vec<f64> = cross.iter().map(|value| value.re).collect();
        fftshift_2d(&real, self.size)
    }
}

fn windowed_spectrum(fft: &Fft2d, window: &[f64], samples: &[f64]) -> Vec<Complex<f64>> {
    let mut data: Vec<Complex<f64>> = samples
        .iter()
        .zip(window.iter())
        .map(|(&value, &w)| Complex::new(value * w, 0.0))
        .collect();
    fft.forward(&mut data);
    data
}
