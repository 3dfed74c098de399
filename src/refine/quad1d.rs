//! Quadratic 1D fitting through three equally spaced samples.

/// Estimates the sub-sample peak offset for a quadratic fit.
///
/// Given samples at `x = -1, 0, +1` (`fm`, `f0`, `fp`), this returns the peak
/// offset `dx` in `[-1, 1]` when the fitted parabola is concave and stable.
/// Flat, convex or non-finite neighbourhoods return `None`.
pub(crate) fn quad_peak_offset_1d(fm: f64, f0: f64, fp: f64) -> Option<f64> {
    if !fm.is_finite() || !f0.is_finite() || !fp.is_finite() {
        return None;
    }

    let denom = fm - 2.0 * f0 + fp;
    if denom.abs() < 1e-12 || denom >= 0.0 {
        return None;
    }

    let dx = 0.5 * (fm - fp) / denom;
    if dx.is_finite() && dx.abs() <= 1.0 {
        Some(dx)
    } else {
        None
    }
}
