//! Credential ledger collaborator.
//!
//! The ledger is the external source of truth for credential ownership,
//! delegation and validator endorsement. The governance core only reads it,
//! always as of an explicit checkpoint, and never walks delegation chains:
//! the ledger reports the terminal manager of every credential.

use vota_types::{Address, Checkpoint, Credential, CredentialId, NodeLevel};

pub trait CredentialLedger {
    /// Credentials owned by `owner` at `at`, whether or not delegated away.
    fn owned_credentials(&self, owner: &Address, at: Checkpoint) -> Vec<CredentialId>;

    /// Credentials whose terminal manager at `at` is `delegate` but whose
    /// owner is someone else.
    fn delegated_credentials(&self, delegate: &Address, at: Checkpoint) -> Vec<CredentialId>;

    /// The credential as it stood at `at`, or `None` if it did not exist then.
    fn credential(&self, id: CredentialId, at: Checkpoint) -> Option<Credential>;

    /// Stake backing one credential of `level`.
    fn level_stake(&self, level: NodeLevel) -> u128;

    /// Number of live credentials per level at `at`.
    fn credential_supply(&self, at: Checkpoint) -> Vec<(NodeLevel, u64)>;

    /// The registered endorser of `validator` at `at`, if any.
    fn validator_endorser(&self, validator: &Address, at: Checkpoint) -> Option<Address>;
}
