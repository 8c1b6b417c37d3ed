//! Error types for strategy loading and solver invocation.

use std::fmt;
use std::io;
use veer_core::{ActionId, StateId};

/// Errors from strategy-artifact parsing, load-time consistency
/// checking, or solver invocation.
#[derive(Debug)]
pub enum PolicyError {
    /// An I/O error while reading the artifact, checking freshness, or
    /// capturing solver output.
    Io(io::Error),
    /// The artifact's first line is not a state count.
    MalformedHeader {
        /// The offending line.
        line: String,
    },
    /// A line has the wrong number of fields.
    MalformedLine {
        /// 1-based line number.
        line_no: usize,
        /// Fields the line kind requires.
        expected: usize,
        /// Fields found.
        got: usize,
    },
    /// A field could not be parsed as an integer.
    MalformedField {
        /// 1-based line number.
        line_no: usize,
        /// The raw field text.
        field: String,
    },
    /// A continuation line appeared before any introduction line.
    DanglingContinuation {
        /// 1-based line number.
        line_no: usize,
    },
    /// The same `(control-state, memory)` pair was introduced twice.
    DuplicateState {
        /// Control-state component.
        control: u32,
        /// Memory component.
        memory: u32,
    },
    /// The header count does not match the states introduced.
    StateCountMismatch {
        /// Count declared in the header.
        declared: usize,
        /// States actually introduced.
        found: usize,
    },
    /// An automaton state decides an action the transition table does
    /// not define for its MDP state.
    UnknownDecision {
        /// The MDP state observed.
        state: StateId,
        /// The undefined action.
        action: ActionId,
    },
    /// A reachable MDP successor is missing from an automaton state's
    /// successor map.
    MissingSuccessor {
        /// Control-state component of the automaton state.
        control: u32,
        /// Memory component of the automaton state.
        memory: u32,
        /// The reachable successor with no mapping.
        dest: StateId,
    },
    /// The external solver exited unsuccessfully.
    SolverFailed {
        /// The solver's exit code, if it exited normally.
        status: Option<i32>,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MalformedHeader { line } => {
                write!(f, "malformed strategy header: {line:?}")
            }
            Self::MalformedLine {
                line_no,
                expected,
                got,
            } => {
                write!(
                    f,
                    "strategy line {line_no}: expected {expected} fields, got {got}"
                )
            }
            Self::MalformedField { line_no, field } => {
                write!(f, "strategy line {line_no}: not an integer: {field:?}")
            }
            Self::DanglingContinuation { line_no } => {
                write!(
                    f,
                    "strategy line {line_no}: continuation before any automaton state"
                )
            }
            Self::DuplicateState { control, memory } => {
                write!(f, "automaton state ({control}, {memory}) introduced twice")
            }
            Self::StateCountMismatch { declared, found } => {
                write!(
                    f,
                    "strategy header declares {declared} automaton states, found {found}"
                )
            }
            Self::UnknownDecision { state, action } => {
                write!(
                    f,
                    "policy decides action {action} in state {state}, which the table does not define"
                )
            }
            Self::MissingSuccessor {
                control,
                memory,
                dest,
            } => {
                write!(
                    f,
                    "automaton state ({control}, {memory}) has no mapping for reachable successor {dest}"
                )
            }
            Self::SolverFailed { status } => match status {
                Some(code) => write!(f, "solver exited with code {code}"),
                None => write!(f, "solver terminated by signal"),
            },
        }
    }
}

impl std::error::Error for PolicyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PolicyError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
