//! Rayon-parallel grid evaluation (feature-gated).
//!
//! Every grid cell is scored on the rayon pool and the results are collected
//! back in generation order, so ranking sees exactly what the sequential scan
//! would produce.

use crate::image::{ImageView, Pixel};
use crate::kernel::Kernel;
use crate::search::grid::SearchGrid;
use crate::search::scan::{score_cell, Placement, ScanOutcome};
use crate::util::PhaseMatchResult;
use rayon::prelude::*;
use std::time::Instant;

/// Cell-parallel grid scan.
///
/// Cells that start after the deadline are skipped; cell 0 is always scored.
pub(crate) fn scan_grid_par<K: Kernel, T: Pixel>(
    clip: ImageView<'_, T>,
    grid: &SearchGrid,
    plan: &K::Plan,
    placement: Placement,
    deadline: Option<Instant>,
) -> PhaseMatchResult<ScanOutcome> {
    let scored: Vec<Option<PhaseMatchResult<_>>> = (0..grid.len())
        .into_par_iter()
        .map(|idx| {
            if idx > 0 && deadline.is_some_and(|limit| Instant::now() >= limit) {
                return None;
            }
            grid.cell(idx)
                .map(|cell| score_cell::<K, T>(clip, cell, plan, placement))
        })
        .collect();

    let mut candidates = Vec::with_capacity(scored.len());
    let mut truncated = false;
    for item in scored {
        match item {
            Some(result) => candidates.push(result?),
            None => truncated = true,
        }
    }
    Ok(ScanOutcome {
        candidates,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::scan_grid_par;
    use crate::image::ImageView;
    use crate::kernel::phase::PhaseKernel;
    use crate::refine::PeakRefinement;
    use crate::search::grid::SearchGrid;
    use crate::search::scan::{scan_grid, Placement};
    use crate::search::GridPolicy;
    use crate::template::PhasePlan;

    #[test]
    fn parallel_scan_matches_sequential() {
        let clip: Vec<u8> = (0..24 * 24)
            .map(|i| ((i * 53 + (i / 24) * 29) % 241) as u8)
            .collect();
        let clip = ImageView::from_slice(&clip, 24, 24).unwrap();
        let tpl = clip.crop(5, 7, 16, 16).unwrap();
        let plan = PhasePlan::from_view(tpl, PeakRefinement::None).unwrap();
        let grid = SearchGrid::new(24, 16, 4, 2, GridPolicy::Truncate).unwrap();
        let placement = Placement {
            origin_x: 0.0,
            origin_y: 0.0,
            center: 8.0,
            size: 16,
        };

        let seq = scan_grid::<PhaseKernel, _>(clip, &grid, &plan, placement, None).unwrap();
        let par = scan_grid_par::<PhaseKernel, _>(clip, &grid, &plan, placement, None).unwrap();
        assert_eq!(seq.candidates, par.candidates);
        assert!(!par.truncated);
    }
}
