//! Append-only, checkpoint-versioned value histories.
//!
//! Every governable parameter is stored as an ordered sequence of
//! `(effective_from, value)` entries instead of a single overwritable slot,
//! so "what was true at checkpoint X" stays answerable for proposals whose
//! snapshot or deadline has already passed.
//!
//! Entries are strictly increasing in checkpoint. Pushing at the same
//! checkpoint as the latest entry replaces that entry's value; pushing at an
//! earlier checkpoint is rejected. Lookups are O(log n) via binary search.

use serde::{Deserialize, Serialize};
use vota_types::Checkpoint;

use crate::error::GovernanceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoints<T> {
    entries: Vec<(Checkpoint, T)>,
}

impl<T> Checkpoints<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A history with a single entry effective from `at`.
    pub fn with_initial(at: Checkpoint, value: T) -> Self {
        Self {
            entries: vec![(at, value)],
        }
    }

    /// Record `value` as effective from `at`.
    ///
    /// Returns the value that was latest before the push, if any.
    pub fn push(&mut self, at: Checkpoint, value: T) -> Result<Option<T>, GovernanceError>
    where
        T: Clone,
    {
        match self.latest_checkpoint() {
            Some(latest) if at < latest => Err(GovernanceError::CheckpointOutOfOrder {
                latest,
                attempted: at,
            }),
            Some(latest) if at == latest => {
                let last = self.entries.len() - 1;
                Ok(Some(std::mem::replace(&mut self.entries[last].1, value)))
            }
            _ => {
                let previous = self.latest().cloned();
                self.entries.push((at, value));
                Ok(previous)
            }
        }
    }

    /// The value in effect at `at`: the entry with the greatest checkpoint `<= at`.
    pub fn lookup(&self, at: Checkpoint) -> Option<&T> {
        let idx = self.entries.partition_point(|(key, _)| *key <= at);
        idx.checked_sub(1).map(|i| &self.entries[i].1)
    }

    /// Like [`lookup`](Self::lookup), failing with `NotSetAtTimepoint` when no
    /// entry predates `at`.
    pub fn get_at(&self, at: Checkpoint) -> Result<&T, GovernanceError> {
        self.lookup(at).ok_or(GovernanceError::NotSetAtTimepoint(at))
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.last().map(|(_, v)| v)
    }

    pub fn latest_checkpoint(&self) -> Option<Checkpoint> {
        self.entries.last().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Checkpoint, T)> {
        self.entries.iter()
    }

    /// Whether the entries are strictly increasing in checkpoint. Histories
    /// built through [`push`](Self::push) always are; decoded ones may not be.
    pub fn is_ordered(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }
}

impl<T> Default for Checkpoints<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(n: u64) -> Checkpoint {
        Checkpoint::new(n)
    }

    #[test]
    fn lookup_before_first_entry_fails() {
        let history = Checkpoints::with_initial(cp(5), 20u32);
        assert!(history.lookup(cp(4)).is_none());
        assert!(matches!(
            history.get_at(cp(4)),
            Err(GovernanceError::NotSetAtTimepoint(c)) if c == cp(4)
        ));
        assert_eq!(history.get_at(cp(5)).unwrap(), &20);
    }

    #[test]
    fn lookup_picks_latest_entry_at_or_before() {
        let mut history = Checkpoints::with_initial(cp(0), 20u32);
        history.push(cp(10), 75).unwrap();
        history.push(cp(20), 50).unwrap();

        assert_eq!(history.lookup(cp(0)), Some(&20));
        assert_eq!(history.lookup(cp(9)), Some(&20));
        assert_eq!(history.lookup(cp(10)), Some(&75));
        assert_eq!(history.lookup(cp(19)), Some(&75));
        assert_eq!(history.lookup(cp(20)), Some(&50));
        assert_eq!(history.lookup(cp(u64::MAX)), Some(&50));
    }

    #[test]
    fn push_returns_previous_latest() {
        let mut history = Checkpoints::new();
        assert_eq!(history.push(cp(1), 1u32).unwrap(), None);
        assert_eq!(history.push(cp(2), 2).unwrap(), Some(1));
        assert_eq!(history.latest(), Some(&2));
        assert_eq!(history.latest_checkpoint(), Some(cp(2)));
    }

    #[test]
    fn push_at_same_checkpoint_replaces_value() {
        let mut history = Checkpoints::with_initial(cp(3), 1u32);
        assert_eq!(history.push(cp(3), 9).unwrap(), Some(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.lookup(cp(3)), Some(&9));
    }

    #[test]
    fn push_out_of_order_is_rejected_without_mutation() {
        let mut history = Checkpoints::with_initial(cp(10), 1u32);
        let err = history.push(cp(9), 2).unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::CheckpointOutOfOrder { latest, attempted }
                if latest == cp(10) && attempted == cp(9)
        ));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest(), Some(&1));
    }

    #[test]
    fn decoded_history_reports_disorder() {
        let history: Checkpoints<u32> = Checkpoints::with_initial(cp(1), 1);
        assert!(history.is_ordered());

        let entries = vec![(cp(5), 20u32), (cp(2), 30)];
        let shuffled: Checkpoints<u32> =
            bincode::deserialize(&bincode::serialize(&entries).unwrap()).unwrap();
        assert!(!shuffled.is_ordered());
        assert_eq!(shuffled.len(), 2);
    }

    #[test]
    fn empty_history_has_nothing() {
        let history: Checkpoints<u32> = Checkpoints::default();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(history.lookup(cp(100)).is_none());
    }
}
