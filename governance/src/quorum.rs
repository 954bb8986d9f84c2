//! Time-varying quorum.
//!
//! The threshold at a checkpoint is a fraction of the whole network's
//! normalized weight at that checkpoint, with both the fraction and the
//! min-stake divisor read from their versioned histories. Changing the
//! numerator at checkpoint N therefore leaves every threshold before N intact.

use vota_types::{Checkpoint, NodeLevel};

use crate::error::GovernanceError;
use crate::ledger::CredentialLedger;
use crate::params::{GovernanceParams, QUORUM_DENOMINATOR};
use crate::power::NORMALIZATION;

pub struct QuorumEngine<'a, L> {
    ledger: &'a L,
    params: &'a GovernanceParams,
}

impl<'a, L: CredentialLedger> QuorumEngine<'a, L> {
    pub fn new(ledger: &'a L, params: &'a GovernanceParams) -> Self {
        Self { ledger, params }
    }

    pub fn quorum_numerator(&self, at: Checkpoint) -> Result<u32, GovernanceError> {
        self.params.quorum_numerator(at)
    }

    pub fn min_stake(&self, at: Checkpoint) -> Result<u128, GovernanceError> {
        self.params.min_staked_amount(at)
    }

    /// Aggregate normalized weight of every live credential at `at`.
    pub fn total_weight(&self, at: Checkpoint) -> Result<u128, GovernanceError> {
        let min_stake = self.params.min_staked_amount(at)?;
        let multipliers = self.params.level_multipliers(at)?;
        let stake_sum = self
            .ledger
            .credential_supply(at)
            .into_iter()
            .fold(0u128, |acc, (level, count): (NodeLevel, u64)| {
                let per_credential = self
                    .ledger
                    .level_stake(level)
                    .saturating_mul(multipliers.get(level) as u128);
                acc.saturating_add(per_credential.saturating_mul(count as u128))
            });
        Ok(stake_sum.saturating_mul(NORMALIZATION) / min_stake)
    }

    /// Absolute weight a proposal must collect to reach quorum at `at`.
    pub fn quorum(&self, at: Checkpoint) -> Result<u128, GovernanceError> {
        let numerator = self.quorum_numerator(at)?;
        let total = self.total_weight(at)?;
        Ok(total.saturating_mul(numerator as u128) / QUORUM_DENOMINATOR as u128)
    }

    /// Whether `tallied` weight meets the quorum in effect at `deadline`.
    pub fn is_reached(&self, tallied: u128, deadline: Checkpoint) -> Result<bool, GovernanceError> {
        Ok(tallied >= self.quorum(deadline)?)
    }
}
