//! Veer: grid-world MDP construction and finite-memory policy
//! execution.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all veer sub-crates. For most users, adding `veer` as a single
//! dependency is sufficient.
//!
//! # Pipeline
//!
//! ```text
//! SceneGrid + ScenarioConfig
//!       │
//!       ▼
//! Dynamics model ──► StateSpace ──► TransitionTable ──► .sta/.lab/.tra
//!                                        │                   │
//!                                        │             external solver
//!                                        │                   │
//!                                        ▼                   ▼
//!                                   Simulator ◄── PolicyAutomaton
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use veer::prelude::*;
//!
//! // A 3x1 corridor with two robots that both stand still.
//! let grid = SceneGrid::filled(3, 1, 0).unwrap();
//! let params = ParamFile::parse(
//!     "initXA = 0\ninitYA = 0\ninitXB = 2\ninitYB = 0\npositionUpdateNoise = 0.0\n",
//! )
//! .unwrap();
//! let config = ScenarioConfig::from_params(&params).unwrap();
//!
//! let model = TwoRobotModel::new(grid, &config).unwrap();
//! let states = StateSpace::build(&model).unwrap();
//! let table = TransitionTable::build(&model, &states).unwrap();
//!
//! let init = states.initial_state(&model).unwrap();
//! let artifact = format!("1\n0 0 {init} 24\n-> {init} 0 0\n");
//! let automaton = PolicyAutomaton::parse(artifact.as_bytes()).unwrap();
//! automaton.check_against(&table).unwrap();
//!
//! let mut sim = Simulator::new(&table, &automaton).with_state_space(&states);
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//! let report = sim.step(&mut rng).unwrap();
//! assert!(!report.crashed);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `veer-core` | Ids, configurations, transition records |
//! | [`scene`] | `veer-scene` | Scene grid, parameter files, scenario config |
//! | [`mdp`] | `veer-mdp` | Enumeration, dynamics models, transition table, file I/O |
//! | [`policy`] | `veer-policy` | Strategy loading, consistency checks, solver invocation |
//! | [`sim`] | `veer-sim` | Stochastic simulator and control loop |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core ids, configurations, and transition records (`veer-core`).
pub use veer_core as types;

/// Scene model and scenario configuration (`veer-scene`).
pub use veer_scene as scene;

/// State-space enumeration and the transition engine (`veer-mdp`).
pub use veer_mdp as mdp;

/// Strategy-artifact loading and solver invocation (`veer-policy`).
pub use veer_policy as policy;

/// Stochastic policy execution (`veer-sim`).
pub use veer_sim as sim;

/// Common imports for typical veer usage.
///
/// ```rust
/// use veer::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use veer_core::{ActionId, Config, MassAccumulator, StateId, TickId, Transition};

    // Scene
    pub use veer_scene::{ParamFile, SceneGrid, ScenarioConfig, ScenarioParams};

    // MDP construction
    pub use veer_mdp::{
        Dynamics, StateSpace, TransitionTable, TwoRobotModel, UnicycleModel,
    };

    // Policy
    pub use veer_policy::{Cursor, PolicyAutomaton, SolverCommand, SolverOutcome};

    // Simulation
    pub use veer_sim::{ControlEvent, SimLoop, SimReport, SimStatus, Simulator};

    // Errors
    pub use veer_mdp::MdpError;
    pub use veer_policy::PolicyError;
    pub use veer_scene::SceneError;
    pub use veer_sim::SimError;

    // Re-export the RNG seeding trait the simulator step expects.
    pub use rand::SeedableRng;
}
