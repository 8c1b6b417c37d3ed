//! Error types for policy execution.

use std::fmt;
use veer_core::{ActionId, StateId};

/// Fatal inconsistencies detected while executing a policy.
///
/// These indicate a corrupt or mismatched solver artifact, never a
/// normal terminal condition. The crashed state is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// The table defines no distribution for the decided
    /// `(state, action)` pair.
    MissingDistribution {
        /// MDP state the automaton observes.
        state: StateId,
        /// The decided action.
        action: ActionId,
    },
    /// The distribution for the decided pair is empty.
    EmptyDistribution {
        /// MDP state the automaton observes.
        state: StateId,
        /// The decided action.
        action: ActionId,
    },
    /// A sampled successor has no entry in the automaton's successor
    /// map.
    InconsistentPolicy {
        /// Control-state component of the active automaton state.
        control: u32,
        /// Memory component of the active automaton state.
        memory: u32,
        /// The sampled successor with no mapping.
        dest: StateId,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDistribution { state, action } => {
                write!(
                    f,
                    "no transition distribution for state {state} action {action}"
                )
            }
            Self::EmptyDistribution { state, action } => {
                write!(
                    f,
                    "empty transition distribution for state {state} action {action}"
                )
            }
            Self::InconsistentPolicy {
                control,
                memory,
                dest,
            } => {
                write!(
                    f,
                    "automaton state ({control}, {memory}) has no mapping for sampled successor {dest}"
                )
            }
        }
    }
}

impl std::error::Error for SimError {}
