//! Per-proposal vote accounting.
//!
//! Every accepted ballot splits its weight evenly across the selected
//! choices. Integer division leaves a remainder of at most `k - 1` units
//! for `k` selections; it goes to the lowest selected index so that the
//! choice totals always sum to exactly the weight cast.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use vota_types::{Address, Checkpoint, CredentialId, ProposalId};

use crate::choice::ChoiceMask;

/// A recorded ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub choices: ChoiceMask,
    pub weight: u128,
    pub reason: Option<String>,
    /// Credentials whose weight this ballot consumed.
    pub used_credentials: BTreeSet<CredentialId>,
    /// Validator named on the ballot; it may back no other ballot on this proposal.
    pub validator_endorsee: Option<Address>,
    pub cast_at: Checkpoint,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTally {
    choice_weights: Vec<u128>,
    votes: BTreeMap<Address, Vote>,
    used_validators: BTreeSet<Address>,
    used_credentials: BTreeSet<CredentialId>,
}

impl ProposalTally {
    pub fn new(choice_count: usize) -> Self {
        Self {
            choice_weights: vec![0; choice_count],
            ..Self::default()
        }
    }

    pub fn choice_weights(&self) -> &[u128] {
        &self.choice_weights
    }

    /// Sum of every accepted ballot's weight.
    pub fn total_weight(&self) -> u128 {
        self.votes.values().map(|v| v.weight).sum()
    }

    pub fn vote(&self, voter: &Address) -> Option<&Vote> {
        self.votes.get(voter)
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.votes.contains_key(voter)
    }

    pub fn validator_used(&self, validator: &Address) -> bool {
        self.used_validators.contains(validator)
    }

    /// The first credential in `credentials` that an earlier ballot consumed.
    pub fn first_consumed<'c>(
        &self,
        credentials: impl IntoIterator<Item = &'c CredentialId>,
    ) -> Option<CredentialId> {
        credentials
            .into_iter()
            .find(|id| self.used_credentials.contains(id))
            .copied()
    }

    /// Record `vote` for `voter`. Callers have already checked eligibility.
    pub fn record(&mut self, voter: Address, vote: Vote) {
        for (index, share) in split_weight(vote.weight, vote.choices) {
            if let Some(slot) = self.choice_weights.get_mut(index as usize) {
                *slot = slot.saturating_add(share);
            }
        }
        if let Some(validator) = vote.validator_endorsee {
            self.used_validators.insert(validator);
        }
        self.used_credentials.extend(vote.used_credentials.iter().copied());
        self.votes.insert(voter, vote);
    }
}

/// Split `weight` across the selected indices, remainder to the lowest one.
pub fn split_weight(weight: u128, choices: ChoiceMask) -> Vec<(u8, u128)> {
    let selected = choices.count() as u128;
    if selected == 0 {
        return Vec::new();
    }
    let share = weight / selected;
    let remainder = weight % selected;
    choices
        .indices()
        .enumerate()
        .map(|(n, index)| {
            let extra = if n == 0 { remainder } else { 0 };
            (index, share + extra)
        })
        .collect()
}

/// Tallies for every proposal, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    proposals: HashMap<ProposalId, ProposalTally>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, id: ProposalId, choice_count: usize) {
        self.proposals
            .entry(id)
            .or_insert_with(|| ProposalTally::new(choice_count));
    }

    pub fn get(&self, id: &ProposalId) -> Option<&ProposalTally> {
        self.proposals.get(id)
    }

    pub fn get_mut(&mut self, id: &ProposalId) -> Option<&mut ProposalTally> {
        self.proposals.get_mut(id)
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.proposals
            .get(id)
            .is_some_and(|tally| tally.has_voted(voter))
    }

    pub fn total_weight(&self, id: &ProposalId) -> u128 {
        self.proposals.get(id).map_or(0, ProposalTally::total_weight)
    }
}
