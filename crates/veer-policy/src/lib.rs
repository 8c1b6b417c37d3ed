//! Strategy-artifact loading and solver invocation.
//!
//! The external policy solver consumes the state/label/transition files
//! and produces a finite-memory strategy artifact. This crate parses
//! that artifact into a [`PolicyAutomaton`], verifies it against the
//! transition table at load time, and re-runs the solver when the
//! artifact is missing or stale.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod automaton;
pub mod error;
pub mod solver;

pub use automaton::{Cursor, PolicyAutomaton, PolicyEntry};
pub use error::PolicyError;
pub use solver::{load_strategy, SolverCommand, SolverOutcome};
