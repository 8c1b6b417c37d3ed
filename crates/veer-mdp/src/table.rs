//! The sparse transition table.

use crate::dynamics::Dynamics;
use crate::error::MdpError;
use crate::state_space::StateSpace;
use indexmap::IndexMap;
use veer_core::{ActionId, StateId, Transition, PROB_TOLERANCE};

/// Construction counts reported after a table build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildSummary {
    /// Total state count, error state included.
    pub num_states: u32,
    /// Number of emitted transition records.
    pub num_records: usize,
    /// Number of `(state, action)` distributions, error self-loop
    /// included (the transition-file matrix-size hint).
    pub size_hint: u64,
}

/// Sparse transition collection, indexed by `(source, action)`.
///
/// Holds the flat record list in serialization order and an
/// insertion-ordered index from `(source, action)` to the successor
/// list the simulator samples from. The error state's self-loop under
/// `ActionId(0)` is always the final record, making the table total
/// over the error state. Immutable once built.
#[derive(Clone, Debug)]
pub struct TransitionTable {
    records: Vec<Transition>,
    index: IndexMap<(StateId, ActionId), Vec<(StateId, f64)>>,
    num_states: u32,
    size_hint: u64,
}

impl TransitionTable {
    /// Build the full table from a dynamics model.
    ///
    /// States are visited in enumeration order and actions in the
    /// model's emission order, so the record list is deterministic.
    /// Each state's successor computation is independent of every
    /// other's; any parallel construction must merge results back in
    /// this order before serialization.
    pub fn build(model: &dyn Dynamics, states: &StateSpace) -> Result<Self, MdpError> {
        let error_state = states.error_state();
        let mut records = Vec::new();
        let mut index = IndexMap::new();
        let mut size_hint: u64 = 0;

        for (source, config) in states.iter() {
            for action in model.actions(config) {
                let acc = model.successors(config, action, states);
                let sum = acc.total();
                if (sum - 1.0).abs() > PROB_TOLERANCE {
                    return Err(MdpError::UnnormalizedDistribution {
                        state: source,
                        action,
                        sum,
                    });
                }
                let pairs = acc.into_pairs(error_state);
                for &(dest, probability) in &pairs {
                    records.push(Transition {
                        source,
                        action,
                        dest,
                        probability,
                    });
                }
                index.insert((source, action), pairs);
                size_hint += 1;
            }
        }

        // The error state is absorbing: one defined action, self-loop
        // with probability 1, always the final record.
        records.push(Transition {
            source: error_state,
            action: ActionId(0),
            dest: error_state,
            probability: 1.0,
        });
        index.insert((error_state, ActionId(0)), vec![(error_state, 1.0)]);
        size_hint += 1;

        Ok(Self {
            records,
            index,
            num_states: states.num_states(),
            size_hint,
        })
    }

    /// Rebuild a table from parsed records (transition-file reading,
    /// test fixtures).
    ///
    /// Records group by `(source, action)` in encounter order; every
    /// group must sum to 1.0 within tolerance and every record must
    /// carry positive probability.
    pub fn from_records(
        num_states: u32,
        size_hint: u64,
        records: Vec<Transition>,
    ) -> Result<Self, MdpError> {
        if num_states == 0 {
            return Err(MdpError::EmptyStateSpace);
        }
        let mut index: IndexMap<(StateId, ActionId), Vec<(StateId, f64)>> = IndexMap::new();
        for record in &records {
            if record.probability <= 0.0 {
                return Err(MdpError::NonPositiveProbability {
                    state: record.source,
                    action: record.action,
                    dest: record.dest,
                    probability: record.probability,
                });
            }
            index
                .entry((record.source, record.action))
                .or_default()
                .push((record.dest, record.probability));
        }
        for (&(state, action), successors) in &index {
            let sum: f64 = successors.iter().map(|&(_, p)| p).sum();
            if (sum - 1.0).abs() > PROB_TOLERANCE {
                return Err(MdpError::UnnormalizedDistribution { state, action, sum });
            }
        }
        Ok(Self {
            records,
            index,
            num_states,
            size_hint,
        })
    }

    /// Ordered successor list of `(state, action)`, if defined.
    pub fn successor_list(&self, state: StateId, action: ActionId) -> Option<&[(StateId, f64)]> {
        self.index.get(&(state, action)).map(Vec::as_slice)
    }

    /// All records in serialization order.
    pub fn records(&self) -> &[Transition] {
        &self.records
    }

    /// Total state count, error state included.
    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    /// The absorbing error state (always the final id).
    pub fn error_state(&self) -> StateId {
        StateId(self.num_states - 1)
    }

    /// Matrix-size hint for the transition-file header.
    pub fn size_hint(&self) -> u64 {
        self.size_hint
    }

    /// Construction counts.
    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            num_states: self.num_states,
            num_records: self.records.len(),
            size_hint: self.size_hint,
        }
    }
}
