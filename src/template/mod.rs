//! Template plans: per-call precomputation shared by every candidate window.
//!
//! A plan is built once from the template patch and then scores any number of
//! equally sized windows. Both plans require square patches.

mod phase;
mod zncc;

pub use phase::PhasePlan;
pub use zncc::ZnccPlan;

use crate::image::ImageView;
use crate::util::{PhaseMatchError, PhaseMatchResult};

/// Checks that `view` is `size x size`.
pub(crate) fn ensure_square<T>(view: &ImageView<'_, T>, size: usize) -> PhaseMatchResult<()> {
    if view.width() != size || view.height() != size {
        return Err(PhaseMatchError::ShapeMismatch {
            expected: size,
            width: view.width(),
            height: view.height(),
        });
    }
    Ok(())
}
