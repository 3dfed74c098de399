//! SIMD-accelerated Pearson kernel using the `wide` crate.
//!
//! The inner template loop processes four samples at a time with `f64x4`
//! and folds the remainder of each row in scalar code.

use crate::image::{ImageView, Pixel};
use crate::kernel::scalar::pearson_from_sums;
use crate::kernel::{Kernel, WindowScore};
use crate::template::{ensure_square, ZnccPlan};
use crate::util::{PhaseMatchError, PhaseMatchResult};
use wide::f64x4;

const LANES: usize = 4;

#[inline]
fn load_pixels<T: Pixel>(slice: &[T]) -> f64x4 {
    f64x4::from([
        slice[0].to_f64(),
        slice[1].to_f64(),
        slice[2].to_f64(),
        slice[3].to_f64(),
    ])
}

#[inline]
fn load_f64x4(slice: &[f64]) -> f64x4 {
    f64x4::from([slice[0], slice[1], slice[2], slice[3]])
}

#[inline]
fn hsum(v: f64x4) -> f64 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3]
}

/// SIMD zero-mean normalized cross-correlation kernel.
pub struct ZnccSimd;

impl Kernel for ZnccSimd {
    type Plan = ZnccPlan;

    fn score_window<T: Pixel>(
        window: ImageView<'_, T>,
        plan: &Self::Plan,
    ) -> PhaseMatchResult<WindowScore> {
        ensure_square(&window, plan.size())?;
        let size = plan.size();
        let t_prime = plan.zero_mean();
        let simd_end = size / LANES * LANES;

        let mut dot_vec = f64x4::ZERO;
        let mut sum_i_vec = f64x4::ZERO;
        let mut sum_i2_vec = f64x4::ZERO;
        let mut dot_s = 0.0f64;
        let mut sum_i_s = 0.0f64;
        let mut sum_i2_s = 0.0f64;

        for y in 0..size {
            let row = window.row(y).ok_or(PhaseMatchError::BufferTooSmall {
                needed: y * window.stride() + size,
                got: window.as_slice().len(),
            })?;
            let base = y * size;

            let mut x = 0;
            while x < simd_end {
                let img_vals = load_pixels(&row[x..]);
                let tpl_vals = load_f64x4(&t_prime[base + x..]);
                dot_vec += tpl_vals * img_vals;
                sum_i_vec += img_vals;
                sum_i2_vec += img_vals * img_vals;
                x += LANES;
            }

            while x < size {
                let value = row[x].to_f64();
                dot_s += t_prime[base + x] * value;
                sum_i_s += value;
                sum_i2_s += value * value;
                x += 1;
            }
        }

        let dot = hsum(dot_vec) + dot_s;
        let sum_i = hsum(sum_i_vec) + sum_i_s;
        let sum_i2 = hsum(sum_i2_vec) + sum_i2_s;

        Ok(WindowScore {
            dx: 0.0,
            dy: 0.0,
            score: pearson_from_sums(dot, sum_i, sum_i2, plan.var_t(), (size * size) as f64),
        })
    }
}
