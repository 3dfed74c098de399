//! Reduction of ranked candidates to a single position.

use crate::candidate::{top_k, Candidate};
use crate::search::Rounding;
use crate::util::math::mean;
use crate::util::{PhaseMatchError, PhaseMatchResult};

/// Mean position of the informative candidates among the top `count`.
///
/// `ranked` must already be sorted. Candidates with a zero or non-finite
/// score are skipped; if none is left the call fails with `DegenerateScore`.
/// Returns `(mean_x, mean_y, averaged)`.
pub(crate) fn average_top(ranked: &[Candidate], count: usize) -> PhaseMatchResult<(f64, f64, usize)> {
    let selected: Vec<&Candidate> = top_k(ranked, count)
        .iter()
        .filter(|c| c.is_informative())
        .collect();
    let degenerate = || PhaseMatchError::DegenerateScore {
        candidates: ranked.len(),
    };
    let mean_x = mean(selected.iter().map(|c| c.x)).ok_or_else(degenerate)?;
    let mean_y = mean(selected.iter().map(|c| c.y)).ok_or_else(degenerate)?;
    Ok((mean_x, mean_y, selected.len()))
}

/// Converts a real coordinate to whole pixels.
pub(crate) fn to_pixel(value: f64, rounding: Rounding) -> i64 {
    match rounding {
        Rounding::Truncate => value.trunc() as i64,
        Rounding::Nearest => value.round() as i64,
    }
}
