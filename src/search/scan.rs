//! Sequential evaluation of the candidate grid.

use crate::candidate::Candidate;
use crate::image::{ImageView, Pixel};
use crate::kernel::Kernel;
use crate::search::grid::{GridCell, SearchGrid};
use crate::util::PhaseMatchResult;
use std::time::Instant;

/// Maps clip-local window results to reference image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Placement {
    /// Clip origin in reference coordinates, `estimate - search_size / 2`.
    pub(crate) origin_x: f64,
    pub(crate) origin_y: f64,
    /// Offset from a window origin to its center.
    pub(crate) center: f64,
    /// Window side length.
    pub(crate) size: usize,
}

/// Candidates in grid order and whether the deadline cut the scan short.
#[derive(Clone, Debug)]
pub(crate) struct ScanOutcome {
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) truncated: bool,
}

/// Scores one grid cell and places the result in reference coordinates.
pub(crate) fn score_cell<K: Kernel, T: Pixel>(
    clip: ImageView<'_, T>,
    cell: GridCell,
    plan: &K::Plan,
    placement: Placement,
) -> PhaseMatchResult<Candidate> {
    let window = clip.crop(
        cell.x as i64,
        cell.y as i64,
        placement.size,
        placement.size,
    )?;
    let result = K::score_window(window, plan)?;
    Ok(Candidate {
        x: placement.origin_x + cell.x as f64 + placement.center - result.dx,
        y: placement.origin_y + cell.y as f64 + placement.center - result.dy,
        score: result.score,
        grid_idx: cell.idx,
    })
}

/// Scores every cell in generation order.
///
/// With a deadline the scan stops after the first cell scored past it, so
/// at least one candidate is always returned.
pub(crate) fn scan_grid<K: Kernel, T: Pixel>(
    clip: ImageView<'_, T>,
    grid: &SearchGrid,
    plan: &K::Plan,
    placement: Placement,
    deadline: Option<Instant>,
) -> PhaseMatchResult<ScanOutcome> {
    let mut candidates = Vec::with_capacity(grid.len());
    let mut truncated = false;
    for cell in grid.cells() {
        candidates.push(score_cell::<K, T>(clip, cell, plan, placement)?);
        let remaining = cell.idx + 1 < grid.len();
        if remaining && deadline.is_some_and(|limit| Instant::now() >= limit) {
            truncated = true;
            break;
        }
    }
    Ok(ScanOutcome {
        candidates,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::{scan_grid, Placement};
    use crate::image::ImageView;
    use crate::kernel::scalar::ZnccScalar;
    use crate::search::grid::SearchGrid;
    use crate::search::GridPolicy;
    use crate::template::ZnccPlan;
    use std::time::Instant;

    fn fixture() -> (Vec<u8>, Vec<u8>) {
        let clip: Vec<u8> = (0..12 * 12)
            .map(|i| ((i * 37 + (i / 12) * 11) % 199) as u8)
            .collect();
        let tpl: Vec<u8> = (0..8 * 8).map(|i| ((i * 7 + 3) % 23) as u8).collect();
        (clip, tpl)
    }

    fn placement() -> Placement {
        Placement {
            origin_x: 100.0,
            origin_y: 200.0,
            center: 4.0,
            size: 8,
        }
    }

    #[test]
    fn places_candidates_in_reference_frame() {
        let (clip, tpl) = fixture();
        let clip = ImageView::from_slice(&clip, 12, 12).unwrap();
        let plan = ZnccPlan::from_view(ImageView::from_slice(&tpl, 8, 8).unwrap()).unwrap();
        let grid = SearchGrid::new(12, 8, 2, 2, GridPolicy::Strict).unwrap();

        let out = scan_grid::<ZnccScalar, _>(clip, &grid, &plan, placement(), None).unwrap();
        assert!(!out.truncated);
        assert_eq!(out.candidates.len(), 4);
        let positions: Vec<(f64, f64)> = out.candidates.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(
            positions,
            vec![(104.0, 204.0), (104.0, 206.0), (106.0, 204.0), (106.0, 206.0)]
        );
    }

    #[test]
    fn elapsed_deadline_keeps_first_candidate() {
        let (clip, tpl) = fixture();
        let clip = ImageView::from_slice(&clip, 12, 12).unwrap();
        let plan = ZnccPlan::from_view(ImageView::from_slice(&tpl, 8, 8).unwrap()).unwrap();
        let grid = SearchGrid::new(12, 8, 2, 2, GridPolicy::Strict).unwrap();

        let out = scan_grid::<ZnccScalar, _>(clip, &grid, &plan, placement(), Some(Instant::now()))
            .unwrap();
        assert!(out.truncated);
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].grid_idx, 0);
    }
}
