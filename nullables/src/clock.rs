//! Nullable clock: deterministic checkpoints for testing.

use std::cell::Cell;
use vota_governance::SnapshotClock;
use vota_types::Checkpoint;

/// A deterministic snapshot clock.
///
/// The checkpoint only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial: u64) -> Self {
        Self {
            current: Cell::new(initial),
        }
    }

    pub fn now(&self) -> Checkpoint {
        Checkpoint::new(self.current.get())
    }

    /// Advance by a number of checkpoints.
    pub fn advance(&self, steps: u64) {
        self.current.set(self.current.get().saturating_add(steps));
    }

    /// Jump to a specific checkpoint. Moving backwards is a test bug.
    pub fn set(&self, index: u64) {
        assert!(index >= self.current.get(), "snapshot clock must not go backwards");
        self.current.set(index);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SnapshotClock for NullClock {
    fn current(&self) -> Checkpoint {
        self.now()
    }
}
