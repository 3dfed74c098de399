use crate::candidate::Candidate;
use std::cmp::Ordering;

fn candidate_cmp_desc(a: &Candidate, b: &Candidate) -> Ordering {
    let by_score = match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => b.score.total_cmp(&a.score),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    };
    by_score.then_with(|| a.grid_idx.cmp(&b.grid_idx))
}

/// Sorts candidates by descending score.
///
/// NaN scores sort after every number; equal scores keep grid order.
pub fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(candidate_cmp_desc);
}

/// Returns the first `k` entries of an already ranked slice.
pub(crate) fn top_k(ranked: &[Candidate], k: usize) -> &[Candidate] {
    &ranked[..k.min(ranked.len())]
}
