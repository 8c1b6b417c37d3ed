//! Scene model and scenario configuration for veer.
//!
//! A scene is an immutable grid of per-cell category codes plus an
//! immutable [`ScenarioConfig`] of motion parameters. Both are built
//! once, validated up front, and passed by reference into every
//! downstream component; there is no process-wide mutable state.
//!
//! Image loading and palette decoding are external collaborators: this
//! crate accepts the already-decoded category-code grid.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod params;
pub mod scenario;

pub use error::SceneError;
pub use grid::{SceneGrid, MAX_GRID_DIM};
pub use params::ParamFile;
pub use scenario::{ScenarioConfig, ScenarioParams};
