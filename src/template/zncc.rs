//! Zero-mean template statistics for Pearson correlation.

use crate::image::{ImageView, Pixel};
use crate::template::ensure_square;
use crate::util::{PhaseMatchError, PhaseMatchResult};

/// Zero-mean template buffer and its sum of squares.
///
/// A zero-variance template is accepted; every window then scores NaN.
#[derive(Clone, Debug)]
pub struct ZnccPlan {
    size: usize,
    mean: f64,
    zero_mean: Vec<f64>,
    var_t: f64,
}

impl ZnccPlan {
    /// Builds a plan from a square template view.
    pub fn from_view<T: Pixel>(tpl: ImageView<'_, T>) -> PhaseMatchResult<Self> {
        let size = tpl.width();
        ensure_square(&tpl, size)?;
        let count = size
            .checked_mul(size)
            .ok_or(PhaseMatchError::InvalidDimensions {
                width: size,
                height: size,
            })?;

        let samples = tpl.to_f64();
        let mean = samples.iter().sum::<f64>() / count as f64;
        let zero_mean: Vec<f64> = samples.iter().map(|&v| v - mean).collect();
        let var_t = zero_mean.iter().map(|v| v * v).sum();

        Ok(Self {
            size,
            mean,
            zero_mean,
            var_t,
        })
    }

    /// Returns the patch side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the template mean intensity.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the zero-mean template in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }

    /// Returns the template sum of squared deviations.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }
}
