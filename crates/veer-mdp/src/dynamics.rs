//! The `Dynamics` trait: the seam between scenario models and the
//! generic enumeration/table machinery.

use crate::state_space::StateSpace;
use smallvec::SmallVec;
use veer_core::{ActionId, Config, MassAccumulator};

/// A scenario dynamics model.
///
/// Implementations own the scene and the scenario parameters and
/// provide three things: the deterministic enumeration of valid
/// configurations, the per-configuration action set, and the successor
/// distribution of every `(configuration, action)` pair. The trait is
/// object-safe; table construction and file serialization work through
/// `&dyn Dynamics`.
pub trait Dynamics {
    /// Names of the serialized configuration fields, in tuple order.
    ///
    /// These become the state-file header; [`encode_fields`](Self::encode_fields)
    /// must produce values in the same order.
    fn field_names(&self) -> Vec<&'static str>;

    /// Enumerate every valid configuration in deterministic order.
    ///
    /// Two calls on the same model must return the same sequence: state
    /// ids derived from this ordering are referenced by downstream
    /// artifacts and must be stable across runs.
    fn enumerate(&self) -> Vec<Config>;

    /// The scenario's initial configuration.
    fn initial_config(&self) -> Config;

    /// Actions applicable in `config`, in emission order.
    fn actions(&self, config: &Config) -> SmallVec<[ActionId; 32]>;

    /// Successor distribution of `(config, action)`.
    ///
    /// The returned accumulator's total is 1.0 (within the shared
    /// tolerance); mass for outcomes that would leave the grid or
    /// violate a scene invariant lands in the error bucket.
    fn successors(
        &self,
        config: &Config,
        action: ActionId,
        states: &StateSpace,
    ) -> MassAccumulator;

    /// Serialized field tuple of `config`, including derived feature
    /// flags, in [`field_names`](Self::field_names) order.
    fn encode_fields(&self, config: &Config) -> Vec<i32>;

    /// Serialized field tuple of the error state (sentinel positions,
    /// zeroed flags).
    fn sentinel_fields(&self) -> Vec<i32>;
}
