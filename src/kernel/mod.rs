//! Window scoring kernels.
//!
//! A kernel scores one template-sized candidate window against a prepared
//! template plan and reports the displacement of the template inside that
//! window together with a confidence score.

use crate::image::{ImageView, Pixel};
use crate::util::PhaseMatchResult;

/// Result of scoring a single candidate window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowScore {
    /// Horizontal displacement of the correlation peak from the window center.
    pub dx: f64,
    /// Vertical displacement of the correlation peak from the window center.
    pub dy: f64,
    /// Peak magnitude (phase) or correlation coefficient (ZNCC).
    pub score: f64,
}

/// Kernel trait for scoring candidate windows.
pub trait Kernel {
    /// Template-side precomputation shared by every window of a search.
    type Plan: Sync;

    /// Scores `window`, which must have the plan's square size.
    fn score_window<T: Pixel>(
        window: ImageView<'_, T>,
        plan: &Self::Plan,
    ) -> PhaseMatchResult<WindowScore>;
}

pub mod phase;
pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub(crate) mod rayon;
