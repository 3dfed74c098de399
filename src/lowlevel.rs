//! Building blocks for custom registration pipelines.
//!
//! These expose the window kernels, template plans, the grid layout and the
//! candidate ranking used by [`crate::Matcher`]. Most users should call
//! `Matcher::register` or the `phase_match` / `template_match` helpers.

pub use crate::candidate::{rank_candidates, Candidate};
pub use crate::fft::{fftshift_2d, Fft2d};
pub use crate::kernel::phase::{locate_peak, phase_correlate, PhaseKernel};
pub use crate::kernel::scalar::ZnccScalar;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::ZnccSimd;
pub use crate::kernel::{Kernel, WindowScore};
pub use crate::search::grid::{GridCell, SearchGrid};
pub use crate::template::{PhasePlan, ZnccPlan};
