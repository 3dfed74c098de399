//! Candidate window layout inside the search clip.

use crate::search::GridPolicy;
use crate::util::{PhaseMatchError, PhaseMatchResult};

/// One template-sized window of the search grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// Generation order, `ix * y_count + iy`.
    pub idx: usize,
    /// Window origin inside the clip, x.
    pub x: usize,
    /// Window origin inside the clip, y.
    pub y: usize,
}

/// Grid of candidate windows, generated x-outer, y-inner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchGrid {
    x_count: usize,
    y_count: usize,
    step_x: usize,
    step_y: usize,
}

impl SearchGrid {
    /// Lays out windows of `template_size` inside a `search_size` clip.
    ///
    /// Each axis gets `floor((search_size - template_size) / step)` windows.
    pub fn new(
        search_size: usize,
        template_size: usize,
        step_x: usize,
        step_y: usize,
        policy: GridPolicy,
    ) -> PhaseMatchResult<Self> {
        if template_size == 0 || search_size < template_size {
            return Err(PhaseMatchError::InvalidConfig(
                "template_size must be in 1..=search_size",
            ));
        }
        if step_x == 0 || step_y == 0 {
            return Err(PhaseMatchError::InvalidConfig("grid steps must be > 0"));
        }

        let span = search_size - template_size;
        if policy == GridPolicy::Strict {
            for step in [step_x, step_y] {
                if span % step != 0 {
                    return Err(PhaseMatchError::UnevenGridStep { span, step });
                }
            }
        }

        let grid = Self {
            x_count: span / step_x,
            y_count: span / step_y,
            step_x,
            step_y,
        };
        if grid.is_empty() {
            return Err(PhaseMatchError::NoCandidates);
        }
        Ok(grid)
    }

    /// Number of window positions along x.
    pub fn x_count(&self) -> usize {
        self.x_count
    }

    /// Number of window positions along y.
    pub fn y_count(&self) -> usize {
        self.y_count
    }

    /// Total number of windows.
    pub fn len(&self) -> usize {
        self.x_count * self.y_count
    }

    /// Returns true if the grid holds no window.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cell with generation index `idx`.
    pub fn cell(&self, idx: usize) -> Option<GridCell> {
        if idx >= self.len() {
            return None;
        }
        let (ix, iy) = (idx / self.y_count, idx % self.y_count);
        Some(GridCell {
            idx,
            x: ix * self.step_x,
            y: iy * self.step_y,
        })
    }

    /// Iterates cells in generation order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.len()).filter_map(move |idx| self.cell(idx))
    }
}
