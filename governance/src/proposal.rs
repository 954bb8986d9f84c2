//! Governance proposals and their lifecycle.
//!
//! ```text
//! Pending ──▶ Active ──▶ Succeeded ──▶ Executed
//!    │          │    └──▶ Defeated
//!    └──────────┴──▶ Canceled
//! ```
//!
//! Only `canceled` and `executed` are stored; every other state is derived
//! from the current checkpoint and, once voting has closed, the quorum.

use serde::{Deserialize, Serialize};
use std::fmt;
use vota_types::{Address, Checkpoint, ChoiceLabel, ProposalId};

use crate::error::GovernanceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Before the snapshot checkpoint.
    Pending,
    /// Between snapshot and deadline, inclusive.
    Active,
    Canceled,
    /// Voting closed without reaching quorum.
    Defeated,
    /// Voting closed with quorum reached; awaiting execution.
    Succeeded,
    Executed,
}

impl ProposalState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Canceled | Self::Defeated | Self::Executed)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller-supplied content of a new proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProposal {
    /// Checkpoint at which voting opens and voting power is measured.
    pub snapshot: Checkpoint,
    /// Voting window length in checkpoints.
    pub duration: u64,
    pub choices: Vec<ChoiceLabel>,
    pub max_selection: u8,
    pub min_selection: u8,
    /// Opaque reference to off-chain metadata (e.g. a content hash).
    pub description_ref: String,
}

impl NewProposal {
    /// A single-choice ballot over `choices`.
    pub fn single_choice(
        snapshot: Checkpoint,
        duration: u64,
        choices: Vec<ChoiceLabel>,
        description_ref: impl Into<String>,
    ) -> Self {
        Self {
            snapshot,
            duration,
            choices,
            max_selection: 1,
            min_selection: 1,
            description_ref: description_ref.into(),
        }
    }

    pub fn id(&self, proposer: &Address) -> ProposalId {
        vota_crypto::proposal_id(
            proposer,
            self.snapshot,
            self.duration,
            &self.choices,
            &self.description_ref,
            self.max_selection,
            self.min_selection,
        )
    }
}

/// A stored proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub description_ref: String,
    pub snapshot: Checkpoint,
    pub deadline: Checkpoint,
    pub choices: Vec<ChoiceLabel>,
    pub min_selection: u8,
    pub max_selection: u8,
    pub created_at: Checkpoint,
    pub canceled: bool,
    pub cancel_reason: Option<String>,
    pub executed: bool,
    pub execution_comment: Option<String>,
}

impl Proposal {
    pub fn from_request(
        id: ProposalId,
        proposer: Address,
        request: NewProposal,
        created_at: Checkpoint,
    ) -> Self {
        Self {
            id,
            proposer,
            deadline: request.snapshot.after(request.duration),
            snapshot: request.snapshot,
            description_ref: request.description_ref,
            choices: request.choices,
            min_selection: request.min_selection,
            max_selection: request.max_selection,
            created_at,
            canceled: false,
            cancel_reason: None,
            executed: false,
            execution_comment: None,
        }
    }

    /// Derive the lifecycle state at `now`.
    ///
    /// `quorum_reached` is consulted only once the voting window has closed.
    pub fn state_at<F>(
        &self,
        now: Checkpoint,
        quorum_reached: F,
    ) -> Result<ProposalState, GovernanceError>
    where
        F: FnOnce() -> Result<bool, GovernanceError>,
    {
        if self.executed {
            return Ok(ProposalState::Executed);
        }
        if self.canceled {
            return Ok(ProposalState::Canceled);
        }
        if now < self.snapshot {
            return Ok(ProposalState::Pending);
        }
        if now <= self.deadline {
            return Ok(ProposalState::Active);
        }
        if quorum_reached()? {
            Ok(ProposalState::Succeeded)
        } else {
            Ok(ProposalState::Defeated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        let request = NewProposal::single_choice(
            Checkpoint::new(10),
            5,
            vec![ChoiceLabel::new("yes").unwrap(), ChoiceLabel::new("no").unwrap()],
            "ipfs://x",
        );
        let proposer = Address::new([1u8; 20]);
        Proposal::from_request(request.id(&proposer), proposer, request, Checkpoint::new(0))
    }

    fn never() -> Result<bool, GovernanceError> {
        panic!("quorum must not be consulted while voting is open")
    }

    #[test]
    fn deadline_is_snapshot_plus_duration() {
        assert_eq!(proposal().deadline, Checkpoint::new(15));
    }

    #[test]
    fn window_boundaries() {
        let p = proposal();
        assert_eq!(p.state_at(Checkpoint::new(9), never).unwrap(), ProposalState::Pending);
        assert_eq!(p.state_at(Checkpoint::new(10), never).unwrap(), ProposalState::Active);
        assert_eq!(p.state_at(Checkpoint::new(15), never).unwrap(), ProposalState::Active);
        assert_eq!(p.state_at(Checkpoint::new(16), || Ok(true)).unwrap(), ProposalState::Succeeded);
        assert_eq!(p.state_at(Checkpoint::new(16), || Ok(false)).unwrap(), ProposalState::Defeated);
    }

    #[test]
    fn flags_override_time() {
        let mut p = proposal();
        p.canceled = true;
        assert_eq!(p.state_at(Checkpoint::new(12), never).unwrap(), ProposalState::Canceled);
        p.canceled = false;
        p.executed = true;
        assert_eq!(p.state_at(Checkpoint::new(100), never).unwrap(), ProposalState::Executed);
    }

    #[test]
    fn only_closed_outcomes_are_terminal() {
        let p = proposal();
        assert!(!p.state_at(Checkpoint::new(12), never).unwrap().is_terminal());
        assert!(!p.state_at(Checkpoint::new(20), || Ok(true)).unwrap().is_terminal());
        assert!(p.state_at(Checkpoint::new(20), || Ok(false)).unwrap().is_terminal());
    }

    #[test]
    fn quorum_errors_propagate() {
        let p = proposal();
        let result = p.state_at(Checkpoint::new(20), || {
            Err(GovernanceError::NotSetAtTimepoint(Checkpoint::new(15)))
        });
        assert!(matches!(result, Err(GovernanceError::NotSetAtTimepoint(_))));
    }
}
