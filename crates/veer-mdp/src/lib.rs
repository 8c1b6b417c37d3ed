//! State-space enumeration and transition-probability engine.
//!
//! This crate turns a [`SceneGrid`](veer_scene::SceneGrid) plus a
//! [`ScenarioConfig`](veer_scene::ScenarioConfig) into a complete MDP:
//!
//! 1. a [`Dynamics`] model enumerates every valid agent configuration,
//! 2. [`StateSpace`] assigns dense, deterministic state ids (plus the
//!    absorbing error state),
//! 3. [`TransitionTable`] collects the per-action successor
//!    distributions the model computes,
//! 4. [`io`] serializes the state/label/transition files consumed by
//!    the external policy solver and reads transition files back.
//!
//! Two dynamics classes are provided: [`TwoRobotModel`]
//! (noised-cardinal moves with a carry interaction) and
//! [`UnicycleModel`] (continuous-image overlap under a discretized
//! heading).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cardinal;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod state_space;
pub mod table;
pub mod unicycle;

pub use cardinal::{noised_cardinal_step, TwoRobotModel, INTERACT_ACTION, STAY_DIRECTION};
pub use dynamics::Dynamics;
pub use error::MdpError;
pub use state_space::StateSpace;
pub use table::{BuildSummary, TransitionTable};
pub use unicycle::{HeadingCommand, UnicycleModel};
