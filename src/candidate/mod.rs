//! Scored candidate positions and their ranking.

mod rank;

pub use rank::rank_candidates;
pub(crate) use rank::top_k;

/// One scored candidate window, in reference image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Estimated template center, x (column).
    pub x: f64,
    /// Estimated template center, y (row).
    pub y: f64,
    /// Phase correlation peak or Pearson coefficient.
    pub score: f64,
    /// Position of the window in grid generation order.
    pub grid_idx: usize,
}

impl Candidate {
    /// Returns true when the score can take part in averaging.
    ///
    /// Zero and non-finite scores carry no alignment information.
    pub fn is_informative(&self) -> bool {
        self.score.is_finite() && self.score != 0.0
    }
}
