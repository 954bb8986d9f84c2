//! Nullable credential ledger: checkpointed in-memory ownership records.
//!
//! Every mutation takes an explicit checkpoint and is appended to the
//! credential's history, so queries for earlier checkpoints keep returning
//! what was true then. Delegation here is one hop: the recorded delegate is
//! the terminal manager.

use std::collections::HashMap;
use std::sync::Mutex;
use vota_governance::{Checkpoints, CredentialLedger, GovernanceError};
use vota_types::{Address, Checkpoint, Credential, CredentialId, NodeLevel};

struct CredentialRecord {
    level: NodeLevel,
    minted_at: Checkpoint,
    burned_at: Option<Checkpoint>,
    owners: Checkpoints<Address>,
    delegates: Checkpoints<Option<Address>>,
}

impl CredentialRecord {
    fn is_live(&self, at: Checkpoint) -> bool {
        self.minted_at <= at && self.burned_at.map_or(true, |burned| at < burned)
    }

    fn owner(&self, at: Checkpoint) -> Option<Address> {
        self.owners.lookup(at).copied()
    }

    fn delegate(&self, at: Checkpoint) -> Option<Address> {
        self.delegates.lookup(at).copied().flatten()
    }

    fn snapshot(&self, id: CredentialId, at: Checkpoint) -> Option<Credential> {
        if !self.is_live(at) {
            return None;
        }
        let owner = self.owner(at)?;
        Some(Credential {
            id,
            level: self.level,
            owner,
            manager: self.delegate(at).unwrap_or(owner),
            minted_at: self.minted_at,
        })
    }
}

#[derive(Default)]
struct LedgerInner {
    next_id: u64,
    credentials: HashMap<CredentialId, CredentialRecord>,
    endorsers: HashMap<Address, Checkpoints<Option<Address>>>,
    stakes: HashMap<NodeLevel, u128>,
}

impl LedgerInner {
    fn record_mut(&mut self, id: CredentialId) -> Result<&mut CredentialRecord, GovernanceError> {
        self.credentials
            .get_mut(&id)
            .ok_or(GovernanceError::InvalidCredentialId(id))
    }
}

/// An in-memory [`CredentialLedger`] for tests.
#[derive(Default)]
pub struct NullCredentialLedger {
    inner: Mutex<LedgerInner>,
}

impl NullCredentialLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the stake backing one credential of `level`.
    pub fn set_level_stake(&self, level: NodeLevel, stake: u128) {
        self.inner.lock().unwrap().stakes.insert(level, stake);
    }

    /// Mint a new credential owned by `owner` from `at` onward.
    pub fn mint(&self, level: NodeLevel, owner: Address, at: Checkpoint) -> CredentialId {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = CredentialId::new(inner.next_id);
        inner.credentials.insert(
            id,
            CredentialRecord {
                level,
                minted_at: at,
                burned_at: None,
                owners: Checkpoints::with_initial(at, owner),
                delegates: Checkpoints::with_initial(at, None),
            },
        );
        id
    }

    /// Transfer ownership. Any delegation is cleared with it.
    pub fn transfer(
        &self,
        id: CredentialId,
        to: Address,
        at: Checkpoint,
    ) -> Result<(), GovernanceError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner.record_mut(id)?;
        if let Some(latest) = record.delegates.latest_checkpoint().filter(|l| at < *l) {
            return Err(GovernanceError::CheckpointOutOfOrder {
                latest,
                attempted: at,
            });
        }
        record.owners.push(at, to)?;
        record.delegates.push(at, None)?;
        Ok(())
    }

    pub fn delegate(
        &self,
        id: CredentialId,
        to: Address,
        at: Checkpoint,
    ) -> Result<(), GovernanceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record_mut(id)?.delegates.push(at, Some(to))?;
        Ok(())
    }

    pub fn undelegate(&self, id: CredentialId, at: Checkpoint) -> Result<(), GovernanceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record_mut(id)?.delegates.push(at, None)?;
        Ok(())
    }

    /// Destroy a credential from `at` onward.
    pub fn burn(&self, id: CredentialId, at: Checkpoint) -> Result<(), GovernanceError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner.record_mut(id)?;
        if at < record.minted_at {
            return Err(GovernanceError::CheckpointOutOfOrder {
                latest: record.minted_at,
                attempted: at,
            });
        }
        record.burned_at = Some(at);
        Ok(())
    }

    /// Register (or with `None`, clear) the endorser of `validator` from `at` onward.
    pub fn set_validator_endorser(
        &self,
        validator: Address,
        endorser: Option<Address>,
        at: Checkpoint,
    ) -> Result<(), GovernanceError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .endorsers
            .entry(validator)
            .or_default()
            .push(at, endorser)?;
        Ok(())
    }

    fn live_where<F>(&self, at: Checkpoint, predicate: F) -> Vec<CredentialId>
    where
        F: Fn(&CredentialRecord) -> bool,
    {
        let inner = self.inner.lock().unwrap();
        let mut ids: Vec<CredentialId> = inner
            .credentials
            .iter()
            .filter(|(_, record)| record.is_live(at) && predicate(record))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

impl CredentialLedger for NullCredentialLedger {
    fn owned_credentials(&self, owner: &Address, at: Checkpoint) -> Vec<CredentialId> {
        self.live_where(at, |record| record.owner(at).as_ref() == Some(owner))
    }

    fn delegated_credentials(&self, delegate: &Address, at: Checkpoint) -> Vec<CredentialId> {
        self.live_where(at, |record| {
            record.delegate(at).as_ref() == Some(delegate)
                && record.owner(at).as_ref() != Some(delegate)
        })
    }

    fn credential(&self, id: CredentialId, at: Checkpoint) -> Option<Credential> {
        let inner = self.inner.lock().unwrap();
        inner.credentials.get(&id)?.snapshot(id, at)
    }

    fn level_stake(&self, level: NodeLevel) -> u128 {
        let inner = self.inner.lock().unwrap();
        inner
            .stakes
            .get(&level)
            .copied()
            .unwrap_or_else(|| level.reference_stake())
    }

    fn credential_supply(&self, at: Checkpoint) -> Vec<(NodeLevel, u64)> {
        let inner = self.inner.lock().unwrap();
        NodeLevel::ALL
            .iter()
            .filter_map(|level| {
                let count = inner
                    .credentials
                    .values()
                    .filter(|record| record.level == *level && record.is_live(at))
                    .count() as u64;
                (count > 0).then_some((*level, count))
            })
            .collect()
    }

    fn validator_endorser(&self, validator: &Address, at: Checkpoint) -> Option<Address> {
        let inner = self.inner.lock().unwrap();
        inner.endorsers.get(validator)?.lookup(at).copied().flatten()
    }
}
