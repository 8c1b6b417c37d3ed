//! The stochastic simulator: cursor advancement over the policy
//! automaton.

use crate::error::SimError;
use crate::sampler::weighted_draw;
use rand::{Rng, RngExt};
use veer_core::{Config, StateId};
use veer_mdp::{StateSpace, TransitionTable};
use veer_policy::{Cursor, PolicyAutomaton};

/// Execution status of a [`Simulator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimStatus {
    /// The cursor has an automaton entry; stepping advances it.
    Running,
    /// The cursor has no automaton entry: terminal until reset.
    Crashed,
    /// A fatal artifact inconsistency was detected; stepping is
    /// disabled until reset.
    Faulted,
}

/// Per-step output for the caller's rendering frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SimReport {
    /// The realized MDP state driving this frame, or `None` when
    /// crashed.
    pub state: Option<StateId>,
    /// The realized configuration, or `None` when crashed (or when the
    /// realized state is the error state).
    pub config: Option<Config>,
    /// `true` once the crashed terminal condition is reached.
    pub crashed: bool,
}

/// Executes a policy automaton against a transition table.
///
/// Table, automaton, and (optional) state space are shared immutably;
/// the mutable state is the cursor plus the status flags. Steps are
/// synchronous and non-blocking; the caller supplies the (reseedable)
/// random source.
pub struct Simulator<'a> {
    table: &'a TransitionTable,
    automaton: &'a PolicyAutomaton,
    states: Option<&'a StateSpace>,
    cursor: Cursor,
    status: SimStatus,
    fault: Option<SimError>,
}

impl<'a> Simulator<'a> {
    /// Build a simulator with the cursor at `(0, 0)`.
    pub fn new(table: &'a TransitionTable, automaton: &'a PolicyAutomaton) -> Self {
        Self {
            table,
            automaton,
            states: None,
            cursor: Cursor::INITIAL,
            status: SimStatus::Running,
            fault: None,
        }
    }

    /// Attach the state space so reports carry the realized
    /// configuration (for rendering) alongside the state id.
    pub fn with_state_space(mut self, states: &'a StateSpace) -> Self {
        self.states = Some(states);
        self
    }

    /// The active automaton coordinate.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Current execution status.
    pub fn status(&self) -> SimStatus {
        self.status
    }

    /// `true` once the terminal crashed condition is reached.
    pub fn is_crashed(&self) -> bool {
        self.status == SimStatus::Crashed
    }

    /// Report for the current cursor without stepping.
    pub fn report(&self) -> SimReport {
        match self.automaton.entry(self.cursor) {
            Some(entry) => SimReport {
                state: Some(entry.mdp_state),
                config: self.config_of(entry.mdp_state),
                crashed: false,
            },
            None => SimReport {
                state: None,
                config: None,
                crashed: true,
            },
        }
    }

    fn config_of(&self, state: StateId) -> Option<Config> {
        self.states.and_then(|s| s.config_of(state)).cloned()
    }

    /// Advance one step.
    ///
    /// Samples a successor of the automaton's decided `(state, action)`
    /// pair and follows the successor map. Returns the report for the
    /// frame this step realized. When crashed, stepping is a no-op that
    /// keeps returning the crashed report; after a fatal inconsistency
    /// the same error is returned on every call until [`reset`](Self::reset).
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Result<SimReport, SimError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        let Some(entry) = self.automaton.entry(self.cursor) else {
            self.status = SimStatus::Crashed;
            return Ok(SimReport {
                state: None,
                config: None,
                crashed: true,
            });
        };

        let successors = self
            .table
            .successor_list(entry.mdp_state, entry.action)
            .ok_or_else(|| {
                self.record_fault(SimError::MissingDistribution {
                    state: entry.mdp_state,
                    action: entry.action,
                })
            })?;

        let r = rng.random::<f64>();
        let dest = weighted_draw(successors, r).ok_or_else(|| {
            self.record_fault(SimError::EmptyDistribution {
                state: entry.mdp_state,
                action: entry.action,
            })
        })?;

        let next = entry.successors.get(&dest).copied().ok_or_else(|| {
            self.record_fault(SimError::InconsistentPolicy {
                control: self.cursor.control,
                memory: self.cursor.memory,
                dest,
            })
        })?;

        let realized = entry.mdp_state;
        self.cursor = next;
        Ok(SimReport {
            state: Some(realized),
            config: self.config_of(realized),
            crashed: false,
        })
    }

    /// Return the cursor to `(0, 0)` unconditionally, clearing crashed
    /// and faulted conditions.
    pub fn reset(&mut self) {
        self.cursor = Cursor::INITIAL;
        self.status = SimStatus::Running;
        self.fault = None;
    }

    fn record_fault(&mut self, error: SimError) -> SimError {
        self.status = SimStatus::Faulted;
        self.fault = Some(error.clone());
        error
    }
}
