//! Error types for MDP construction and serialization.

use std::fmt;
use std::io;
use veer_core::{ActionId, Config, StateId};

/// Errors from state-space enumeration, table construction, or
/// transition-file I/O.
#[derive(Debug)]
pub enum MdpError {
    /// The scenario configuration does not match the dynamics model.
    InvalidScenario {
        /// Description of the mismatch.
        reason: String,
    },
    /// Enumeration produced the same configuration twice.
    DuplicateConfiguration {
        /// The repeated configuration.
        config: Config,
    },
    /// Enumeration produced no valid configuration.
    EmptyStateSpace,
    /// The state count (configurations plus error state) exceeds `u32`.
    StateCountOverflow {
        /// Number of enumerated configurations.
        count: usize,
    },
    /// The scenario's initial configuration is not a valid state.
    UnknownInitialConfiguration {
        /// The configuration that failed to resolve.
        config: Config,
    },
    /// A successor distribution does not sum to 1.0 within tolerance.
    UnnormalizedDistribution {
        /// Source state of the distribution.
        state: StateId,
        /// Action of the distribution.
        action: ActionId,
        /// The actual sum.
        sum: f64,
    },
    /// A record carries zero or negative probability.
    NonPositiveProbability {
        /// Source state of the record.
        state: StateId,
        /// Action of the record.
        action: ActionId,
        /// Destination of the record.
        dest: StateId,
        /// The offending probability.
        probability: f64,
    },
    /// A transition-file header is not `<states> <size-hint> <records>`.
    MalformedHeader {
        /// The offending line.
        line: String,
    },
    /// A transition-file record could not be parsed.
    MalformedRecord {
        /// 1-based line number.
        line_no: usize,
        /// Description of what went wrong.
        reason: String,
    },
    /// The header's record count does not match the records present.
    RecordCountMismatch {
        /// Count declared in the header.
        declared: usize,
        /// Records actually read.
        found: usize,
    },
    /// An I/O error during file reading or atomic commit.
    Io(io::Error),
}

impl fmt::Display for MdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScenario { reason } => write!(f, "invalid scenario: {reason}"),
            Self::DuplicateConfiguration { config } => {
                write!(f, "configuration {config:?} enumerated twice")
            }
            Self::EmptyStateSpace => write!(f, "scene admits no valid configuration"),
            Self::StateCountOverflow { count } => {
                write!(f, "state count {count} exceeds u32 range")
            }
            Self::UnknownInitialConfiguration { config } => {
                write!(f, "initial configuration {config:?} is not a valid state")
            }
            Self::UnnormalizedDistribution { state, action, sum } => {
                write!(
                    f,
                    "distribution for state {state} action {action} sums to {sum}, expected 1.0"
                )
            }
            Self::NonPositiveProbability {
                state,
                action,
                dest,
                probability,
            } => {
                write!(
                    f,
                    "record {state} {action} {dest} carries non-positive probability {probability}"
                )
            }
            Self::MalformedHeader { line } => {
                write!(f, "malformed transition-file header: {line:?}")
            }
            Self::MalformedRecord { line_no, reason } => {
                write!(f, "malformed transition record at line {line_no}: {reason}")
            }
            Self::RecordCountMismatch { declared, found } => {
                write!(
                    f,
                    "transition-file header declares {declared} records, found {found}"
                )
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for MdpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MdpError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
