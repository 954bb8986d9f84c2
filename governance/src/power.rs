//! Voting power resolution.
//!
//! A participant's power at a checkpoint is the stake-weighted sum of every
//! credential they effectively control at that checkpoint, plus an optional
//! validator term, in fixed point:
//!
//! ```text
//! weight = Σ stake(level) × multiplier(level) × NORMALIZATION / min_stake
//!        + validator_term × NORMALIZATION
//! ```
//!
//! The scale is applied before dividing by the min stake, so a stake sum that
//! is not a multiple of the min stake keeps two decimal places.
//!
//! A credential counts for a participant only if the ledger reports them as
//! its terminal manager at the checkpoint. Because each credential has exactly
//! one terminal manager, delegating moves its weight from owner to delegate
//! and never counts it twice.

use std::collections::BTreeSet;

use vota_types::{Address, Checkpoint, Credential, CredentialId, LevelMultipliers};

use crate::error::GovernanceError;
use crate::ledger::CredentialLedger;
use crate::params::GovernanceParams;

/// Fixed-point scale applied to every resolved weight.
pub const NORMALIZATION: u128 = 100;

/// Result of a power resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VotingPower {
    /// Normalized weight.
    pub weight: u128,
    /// Credentials that contributed a non-zero amount.
    pub used_credentials: BTreeSet<CredentialId>,
    /// Validator whose weight was included, when the endorsement check passed.
    pub validator: Option<Address>,
}

impl VotingPower {
    pub fn is_zero(&self) -> bool {
        self.weight == 0
    }
}

/// `stake × multiplier` for one credential of `credential`'s level.
pub(crate) fn weighted_stake<L: CredentialLedger>(
    ledger: &L,
    credential: &Credential,
    multipliers: &LevelMultipliers,
) -> u128 {
    ledger
        .level_stake(credential.level)
        .saturating_mul(multipliers.get(credential.level) as u128)
}

pub struct VotingPowerResolver<'a, L> {
    ledger: &'a L,
    params: &'a GovernanceParams,
    validator_weight: u128,
}

impl<'a, L: CredentialLedger> VotingPowerResolver<'a, L> {
    pub fn new(ledger: &'a L, params: &'a GovernanceParams, validator_weight: u128) -> Self {
        Self {
            ledger,
            params,
            validator_weight,
        }
    }

    /// Credentials `participant` manages at `at`: owned ones not delegated
    /// away, plus ones delegated to them.
    pub fn effective_credentials(&self, participant: &Address, at: Checkpoint) -> Vec<Credential> {
        let candidates: BTreeSet<CredentialId> = self
            .ledger
            .owned_credentials(participant, at)
            .into_iter()
            .chain(self.ledger.delegated_credentials(participant, at))
            .collect();

        candidates
            .into_iter()
            .filter_map(|id| self.ledger.credential(id, at))
            .filter(|c| c.manager == *participant && c.minted_at <= at)
            .collect()
    }

    /// Resolve `participant`'s power at `at`.
    ///
    /// Unknown or not-yet-minted credentials contribute zero. A validator
    /// that `participant` does not endorse contributes zero; it is not an error.
    pub fn weight(
        &self,
        participant: &Address,
        at: Checkpoint,
        validator: Option<&Address>,
    ) -> Result<VotingPower, GovernanceError> {
        let min_stake = self.params.min_staked_amount(at)?;
        let multipliers = self.params.level_multipliers(at)?;

        let mut stake_sum: u128 = 0;
        let mut used = BTreeSet::new();
        for credential in self.effective_credentials(participant, at) {
            let contribution = weighted_stake(self.ledger, &credential, multipliers);
            if contribution == 0 {
                continue;
            }
            stake_sum = stake_sum.saturating_add(contribution);
            used.insert(credential.id);
        }

        let endorsed = validator
            .filter(|v| !v.is_zero())
            .filter(|v| self.ledger.validator_endorser(v, at).as_ref() == Some(participant))
            .copied();
        let validator_term = if endorsed.is_some() {
            self.validator_weight
        } else {
            0
        };

        let weight = (stake_sum.saturating_mul(NORMALIZATION) / min_stake)
            .saturating_add(validator_term.saturating_mul(NORMALIZATION));

        tracing::debug!(
            %participant,
            checkpoint = at.as_u64(),
            credentials = used.len(),
            validator = endorsed.is_some(),
            weight = %weight,
            "resolved voting power"
        );

        Ok(VotingPower {
            weight,
            used_credentials: used,
            validator: endorsed,
        })
    }
}
