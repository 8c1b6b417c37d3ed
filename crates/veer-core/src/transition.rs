//! Transition records and the ordered probability-mass accumulator.

use crate::id::{ActionId, StateId};
use indexmap::IndexMap;

/// Tolerance for checking that a successor distribution sums to 1.0.
pub const PROB_TOLERANCE: f64 = 1e-9;

/// One serialized MDP transition: `(source, action, destination, probability)`.
///
/// For every reachable `(source, action)` pair the probabilities over
/// destinations sum to 1.0 within [`PROB_TOLERANCE`], and every emitted
/// record carries strictly positive probability.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// State the transition originates from.
    pub source: StateId,
    /// Action under which the transition is taken.
    pub action: ActionId,
    /// State the transition leads to.
    pub dest: StateId,
    /// Probability of this outcome, in `(0.0, 1.0]`.
    pub probability: f64,
}

/// Insertion-ordered accumulator for one `(state, action)` successor
/// distribution.
///
/// Destinations are keyed by state id and accumulate mass on repeated
/// insertion; invalid outcomes accumulate in a separate error bucket
/// that is always emitted last. This replaces coordinate-keyed dictionary
/// accumulation with stable integer keys in the hot enumeration loop.
#[derive(Clone, Debug, Default)]
pub struct MassAccumulator {
    cells: IndexMap<StateId, f64>,
    error_mass: f64,
}

impl MassAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add probability mass for a valid destination state.
    pub fn add(&mut self, dest: StateId, mass: f64) {
        *self.cells.entry(dest).or_insert(0.0) += mass;
    }

    /// Add probability mass to the error bucket.
    pub fn add_error(&mut self, mass: f64) {
        self.error_mass += mass;
    }

    /// Total mass accumulated so far, error bucket included.
    pub fn total(&self) -> f64 {
        self.cells.values().sum::<f64>() + self.error_mass
    }

    /// `true` if no mass has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.error_mass == 0.0
    }

    /// Resolve into an ordered `(destination, probability)` list.
    ///
    /// Destinations appear in insertion order; the error bucket (if it
    /// carries mass) becomes a final entry on `error_state`. Rounding
    /// underflow below zero is clamped and zero-mass entries are dropped,
    /// so every returned probability is strictly positive.
    pub fn into_pairs(self, error_state: StateId) -> Vec<(StateId, f64)> {
        let mut out: Vec<(StateId, f64)> = self
            .cells
            .into_iter()
            .map(|(dest, mass)| (dest, mass.max(0.0)))
            .filter(|&(_, mass)| mass > 0.0)
            .collect();
        let error_mass = self.error_mass.max(0.0);
        if error_mass > 0.0 {
            out.push((error_state, error_mass));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERR: StateId = StateId(99);

    #[test]
    fn repeated_adds_accumulate_on_one_key() {
        let mut acc = MassAccumulator::new();
        acc.add(StateId(3), 0.25);
        acc.add(StateId(3), 0.25);
        acc.add(StateId(1), 0.5);
        let pairs = acc.into_pairs(ERR);
        assert_eq!(pairs, vec![(StateId(3), 0.5), (StateId(1), 0.5)]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut acc = MassAccumulator::new();
        acc.add(StateId(5), 0.2);
        acc.add(StateId(2), 0.3);
        acc.add(StateId(9), 0.5);
        let dests: Vec<StateId> = acc.into_pairs(ERR).into_iter().map(|(d, _)| d).collect();
        assert_eq!(dests, vec![StateId(5), StateId(2), StateId(9)]);
    }

    #[test]
    fn error_bucket_is_emitted_last() {
        let mut acc = MassAccumulator::new();
        acc.add_error(0.3);
        acc.add(StateId(0), 0.7);
        let pairs = acc.into_pairs(ERR);
        assert_eq!(pairs.last(), Some(&(ERR, 0.3)));
    }

    #[test]
    fn zero_and_negative_mass_is_dropped() {
        let mut acc = MassAccumulator::new();
        acc.add(StateId(0), 0.0);
        acc.add(StateId(1), -1e-18);
        acc.add(StateId(2), 1.0);
        let pairs = acc.into_pairs(ERR);
        assert_eq!(pairs, vec![(StateId(2), 1.0)]);
    }

    #[test]
    fn empty_error_bucket_emits_nothing() {
        let mut acc = MassAccumulator::new();
        acc.add(StateId(0), 1.0);
        assert_eq!(acc.into_pairs(ERR).len(), 1);
    }

    #[test]
    fn total_includes_error_mass() {
        let mut acc = MassAccumulator::new();
        acc.add(StateId(0), 0.6);
        acc.add_error(0.4);
        assert!((acc.total() - 1.0).abs() < PROB_TOLERANCE);
    }

    proptest::proptest! {
        // Mass is conserved through resolution: the pair sum equals the
        // accumulated total for non-negative contributions.
        #[test]
        fn resolution_conserves_mass(masses in proptest::collection::vec(0.0f64..1.0, 1..12)) {
            let mut acc = MassAccumulator::new();
            for (i, &m) in masses.iter().enumerate() {
                // Fold every third contribution into the error bucket.
                if i % 3 == 0 {
                    acc.add_error(m);
                } else {
                    acc.add(StateId((i % 4) as u32), m);
                }
            }
            let total = acc.total();
            let sum: f64 = acc.into_pairs(ERR).iter().map(|&(_, p)| p).sum();
            proptest::prop_assert!((sum - total).abs() < 1e-12);
        }
    }
}
