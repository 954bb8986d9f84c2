//! Serializable engine state.
//!
//! Everything the engine mutates lives here so a host can persist it as one
//! blob in whatever key-value store it already runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vota_types::ProposalId;

use crate::error::GovernanceError;
use crate::params::GovernanceParams;
use crate::proposal::Proposal;
use crate::tally::VoteTally;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceState {
    pub(crate) proposals: HashMap<ProposalId, Proposal>,
    /// Proposal ids in creation order.
    pub(crate) proposal_order: Vec<ProposalId>,
    pub(crate) tally: VoteTally,
    pub(crate) params: GovernanceParams,
    pub(crate) validator_weight: u128,
}

impl GovernanceState {
    pub fn new(params: GovernanceParams, validator_weight: u128) -> Self {
        Self {
            proposals: HashMap::new(),
            proposal_order: Vec::new(),
            tally: VoteTally::new(),
            params,
            validator_weight,
        }
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn proposal_count(&self) -> usize {
        self.proposal_order.len()
    }

    pub fn encode(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Serialization(e.to_string()))
    }

    /// Decode and sanity-check a blob produced by [`encode`](Self::encode).
    pub fn decode(data: &[u8]) -> Result<Self, GovernanceError> {
        let state: Self = bincode::deserialize(data)
            .map_err(|e| GovernanceError::Serialization(e.to_string()))?;
        state.check_consistency()?;
        Ok(state)
    }

    fn check_consistency(&self) -> Result<(), GovernanceError> {
        if self.proposal_order.len() != self.proposals.len() {
            return Err(GovernanceError::Serialization(format!(
                "{} ordered ids for {} proposals",
                self.proposal_order.len(),
                self.proposals.len()
            )));
        }
        for id in &self.proposal_order {
            let proposal = self
                .proposals
                .get(id)
                .ok_or_else(|| GovernanceError::Serialization(format!("missing proposal {id}")))?;
            if proposal.id != *id {
                return Err(GovernanceError::Serialization(format!(
                    "proposal stored under {id} claims id {}",
                    proposal.id
                )));
            }
            let tally = self
                .tally
                .get(id)
                .ok_or_else(|| GovernanceError::Serialization(format!("missing tally for {id}")))?;
            if tally.choice_weights().len() != proposal.choices.len() {
                return Err(GovernanceError::Serialization(format!(
                    "tally for {id} has {} slots for {} choices",
                    tally.choice_weights().len(),
                    proposal.choices.len()
                )));
            }
        }
        self.params
            .check_histories()
            .map_err(|e| GovernanceError::Serialization(format!("invalid parameters: {e}")))
    }
}
