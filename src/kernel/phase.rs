//! Windowed phase correlation.
//!
//! Both patches are multiplied by a separable Hamming window, transformed,
//! combined into the normalized cross-power spectrum and transformed back.
//! The peak of the resulting surface gives the translation of the template
//! relative to the window; its height is the confidence score.

use crate::image::{ImageView, Pixel};
use crate::kernel::{Kernel, WindowScore};
use crate::refine::quad2d::{neighbourhood_wrapped, refine_subpixel_2d};
use crate::refine::PeakRefinement;
use crate::template::{ensure_square, PhasePlan};
use crate::util::PhaseMatchResult;

/// Phase correlation kernel.
pub struct PhaseKernel;

impl Kernel for PhaseKernel {
    type Plan = PhasePlan;

    fn score_window<T: Pixel>(
        window: ImageView<'_, T>,
        plan: &Self::Plan,
    ) -> PhaseMatchResult<WindowScore> {
        let surface = plan.correlation_surface(window)?;
        Ok(score_surface(&surface, plan.size(), plan.refinement()))
    }
}

/// Phase-correlates two equally sized square patches.
///
/// Returns the displacement of the correlation peak from the patch center
/// (`peak_col - n / 2`, `peak_row - n / 2`) and the peak height. Identical
/// non-constant patches yield `(0, 0)` with a score close to 1.
pub fn phase_correlate<T: Pixel, U: Pixel>(
    template: ImageView<'_, T>,
    window: ImageView<'_, U>,
) -> PhaseMatchResult<WindowScore> {
    let size = template.width();
    ensure_square(&template, size)?;
    ensure_square(&window, size)?;
    let plan = PhasePlan::from_view(template, PeakRefinement::None)?;
    PhaseKernel::score_window(window, &plan)
}

/// Finds the global maximum of a row-major `n x n` surface.
///
/// Ties keep the first occurrence in row-major order. Returns
/// `(row, col, value)`.
pub fn locate_peak(surface: &[f64], n: usize) -> (usize, usize, f64) {
    let mut best = (0usize, 0usize, f64::NEG_INFINITY);
    for (row, values) in surface.chunks_exact(n).enumerate() {
        for (col, &value) in values.iter().enumerate() {
            if value > best.2 {
                best = (row, col, value);
            }
        }
    }
    best
}

pub(crate) fn score_surface(surface: &[f64], n: usize, refinement: PeakRefinement) -> WindowScore {
    let (row, col, score) = locate_peak(surface, n);
    let (x, y) = match refinement {
        PeakRefinement::None => (col as f64, row as f64),
        PeakRefinement::Quadratic => {
            refine_subpixel_2d(col, row, neighbourhood_wrapped(surface, n, row, col))
        }
    };
    let half = (n / 2) as f64;
    WindowScore {
        dx: x - half,
        dy: y - half,
        score,
    }
}
