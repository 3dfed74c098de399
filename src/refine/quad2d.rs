//! Separable quadratic refinement of a 2D peak.

use crate::refine::quad1d::quad_peak_offset_1d;

/// Refines a peak from its 3x3 neighbourhood `s`, centered at `s[1][1]`.
///
/// `dx` comes from the center row and `dy` from the center column; an
/// ill-conditioned axis keeps the integer coordinate.
pub(crate) fn refine_subpixel_2d(center_x: usize, center_y: usize, s: [[f64; 3]; 3]) -> (f64, f64) {
    let dx = quad_peak_offset_1d(s[1][0], s[1][1], s[1][2]).unwrap_or(0.0);
    let dy = quad_peak_offset_1d(s[0][1], s[1][1], s[2][1]).unwrap_or(0.0);

    (center_x as f64 + dx, center_y as f64 + dy)
}

/// Gathers the 3x3 neighbourhood of `(row, col)` on a square surface,
/// wrapping around the borders as the correlation surface is periodic.
pub(crate) fn neighbourhood_wrapped(surface: &[f64], n: usize, row: usize, col: usize) -> [[f64; 3]; 3] {
    let mut s = [[0.0; 3]; 3];
    for (iy, dy) in [n - 1, 0, 1].into_iter().enumerate() {
        let y = (row + dy) % n;
        for (ix, dx) in [n - 1, 0, 1].into_iter().enumerate() {
            let x = (col + dx) % n;
            s[iy][ix] = surface[y * n + x];
        }
    }
    s
}
