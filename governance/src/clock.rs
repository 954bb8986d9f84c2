//! Snapshot clock collaborator.

use vota_types::Checkpoint;

/// Source of the current logical checkpoint. Must never go backwards.
pub trait SnapshotClock {
    fn current(&self) -> Checkpoint;
}
