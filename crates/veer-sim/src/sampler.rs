//! Weighted successor sampling.

use veer_core::StateId;

/// Sample a successor from an ordered distribution with a draw
/// `r ∈ [0, 1)`.
///
/// Walks the list in stored order, subtracting each probability from
/// the running draw; the first entry whose mass covers the remainder is
/// selected. If floating-point residue exhausts the list without a
/// match, the first entry is returned. This fallback is an intentional
/// policy, kept for reproducibility with existing artifacts. Returns
/// `None` only for an empty list.
pub fn weighted_draw(successors: &[(StateId, f64)], mut r: f64) -> Option<StateId> {
    for &(dest, probability) in successors {
        if r < probability {
            return Some(dest);
        }
        r -= probability;
    }
    successors.first().map(|&(dest, _)| dest)
}
