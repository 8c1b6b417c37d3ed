//! Strongly-typed identifiers and the [`Config`] tuple type.

use smallvec::SmallVec;
use std::fmt;

/// Identifies an MDP state.
///
/// States are assigned sequential ids in enumeration order; the highest
/// id is always the absorbing error state. `StateId(n)` corresponds to
/// the n-th enumerated configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StateId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a discrete action available in some MDP state.
///
/// Action ids are scenario-defined: joint cardinal moves, heading
/// commands, or interaction actions. The error state's single action is
/// always `ActionId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ActionId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing simulation tick counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A physical agent configuration: positions, heading, and flags.
///
/// Uses `SmallVec<[i32; 8]>` to avoid heap allocation for the scenario
/// tuples in use (unicycle `(x, y, dir)` is 3 wide, two-robot
/// `(xA, yA, xB, yB, carry, carry_success)` is 6 wide). Wider tuples
/// spill to the heap transparently.
pub type Config = SmallVec<[i32; 8]>;

/// Sentinel value used for positional fields of the error state when a
/// configuration must be rendered (state files, crash reporting).
pub const ERROR_SENTINEL: i32 = -1;
