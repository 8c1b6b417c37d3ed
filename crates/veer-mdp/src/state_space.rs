//! State-space enumeration: the configuration ↔ id bijection.

use crate::dynamics::Dynamics;
use crate::error::MdpError;
use indexmap::IndexSet;
use veer_core::{Config, StateId};

/// The total ordering of valid configurations plus the absorbing error
/// state.
///
/// Ids are insertion indices of the model's deterministic enumeration,
/// so identical scenes always yield identical ids. The error state is
/// the final id (`num_states() - 1`) and has no configuration.
#[derive(Clone, Debug)]
pub struct StateSpace {
    configs: IndexSet<Config>,
}

impl StateSpace {
    /// Enumerate the model and build the bijection.
    ///
    /// Fails if the model enumerates a configuration twice, enumerates
    /// nothing, or overflows the `u32` id range.
    pub fn build(model: &dyn Dynamics) -> Result<Self, MdpError> {
        let mut configs = IndexSet::new();
        for config in model.enumerate() {
            if !configs.insert(config.clone()) {
                return Err(MdpError::DuplicateConfiguration { config });
            }
        }
        if configs.is_empty() {
            return Err(MdpError::EmptyStateSpace);
        }
        // +1 for the error state.
        if u32::try_from(configs.len() + 1).is_err() {
            return Err(MdpError::StateCountOverflow {
                count: configs.len(),
            });
        }
        Ok(Self { configs })
    }

    /// Id of a configuration, or `None` if it is not a valid state.
    pub fn state_of(&self, config: &Config) -> Option<StateId> {
        self.configs
            .get_index_of(config)
            .map(|i| StateId(i as u32))
    }

    /// Configuration of an id, or `None` for the error state and
    /// out-of-range ids.
    pub fn config_of(&self, id: StateId) -> Option<&Config> {
        self.configs.get_index(id.0 as usize)
    }

    /// The absorbing error state: always the final id.
    pub fn error_state(&self) -> StateId {
        StateId(self.configs.len() as u32)
    }

    /// Total state count, error state included.
    pub fn num_states(&self) -> u32 {
        self.configs.len() as u32 + 1
    }

    /// Number of valid configurations (excludes the error state).
    pub fn num_configurations(&self) -> usize {
        self.configs.len()
    }

    /// Iterate `(id, configuration)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &Config)> {
        self.configs
            .iter()
            .enumerate()
            .map(|(i, c)| (StateId(i as u32), c))
    }

    /// Resolve the model's initial configuration to its state id.
    pub fn initial_state(&self, model: &dyn Dynamics) -> Result<StateId, MdpError> {
        let config = model.initial_config();
        self.state_of(&config)
            .ok_or(MdpError::UnknownInitialConfiguration { config })
    }
}
