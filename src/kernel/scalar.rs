//! Scalar Pearson correlation kernel.

use crate::image::{ImageView, Pixel};
use crate::kernel::{Kernel, WindowScore};
use crate::template::{ensure_square, ZnccPlan};
use crate::util::{PhaseMatchError, PhaseMatchResult};

/// Scalar zero-mean normalized cross-correlation kernel.
///
/// The score is the Pearson coefficient between the flattened template and
/// window; windows are compared in place, so the displacement is always zero.
pub struct ZnccScalar;

impl Kernel for ZnccScalar {
    type Plan = ZnccPlan;

    fn score_window<T: Pixel>(
        window: ImageView<'_, T>,
        plan: &Self::Plan,
    ) -> PhaseMatchResult<WindowScore> {
        ensure_square(&window, plan.size())?;
        let size = plan.size();
        let t_prime = plan.zero_mean();

        let mut dot = 0.0f64;
        let mut sum_i = 0.0f64;
        let mut sum_i2 = 0.0f64;
        for y in 0..size {
            let row = window.row(y).ok_or(PhaseMatchError::BufferTooSmall {
                needed: y * window.stride() + size,
                got: window.as_slice().len(),
            })?;
            let base = y * size;
            for (x, &pixel) in row.iter().enumerate() {
                let value = pixel.to_f64();
                dot += t_prime[base + x] * value;
                sum_i += value;
                sum_i2 += value * value;
            }
        }

        Ok(WindowScore {
            dx: 0.0,
            dy: 0.0,
            score: pearson_from_sums(dot, sum_i, sum_i2, plan.var_t(), (size * size) as f64),
        })
    }
}

/// Pearson coefficient from a zero-mean template dot product and window sums.
///
/// Returns NaN when either side has zero variance.
pub(crate) fn pearson_from_sums(dot: f64, sum_i: f64, sum_i2: f64, var_t: f64, n: f64) -> f64 {
    let var_i = sum_i2 - (sum_i * sum_i) / n;
    let denom = var_t * var_i;
    if denom <= 0.0 {
        return f64::NAN;
    }
    dot / denom.sqrt()
}
