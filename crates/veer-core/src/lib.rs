//! Core types for the veer grid-MDP toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the rest of the workspace:
//! strongly-typed ids, the configuration tuple, transition records, and
//! the ordered probability-mass accumulator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod transition;

pub use id::{ActionId, Config, StateId, TickId, ERROR_SENTINEL};
pub use transition::{MassAccumulator, Transition, PROB_TOLERANCE};
