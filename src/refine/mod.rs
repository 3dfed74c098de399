//! Sub-pixel refinement of correlation peaks.

pub(crate) mod quad1d;
pub(crate) mod quad2d;

/// How a correlation peak is turned into a displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PeakRefinement {
    /// Integer peak position only.
    #[default]
    None,
    /// Separable three-point parabola fit around the peak.
    Quadratic,
}
