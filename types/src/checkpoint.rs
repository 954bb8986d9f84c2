//! Logical checkpoint index used to snapshot governance state.
//!
//! Checkpoints are discrete steps on a monotonic logical clock (for a ledger
//! host, typically the block number). Every governance fact is stamped with
//! one and every historical query is parameterised by one.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Checkpoint(u64);

impl Checkpoint {
    pub const GENESIS: Self = Self(0);

    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The checkpoint `steps` after this one, saturating at `u64::MAX`.
    pub fn after(&self, steps: u64) -> Self {
        Self(self.0.saturating_add(steps))
    }

    /// Number of steps from `self` until `later` (zero if `later` is not after `self`).
    pub fn steps_until(&self, later: Checkpoint) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
