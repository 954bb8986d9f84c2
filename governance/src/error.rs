use thiserror::Error;
use vota_types::{Address, Checkpoint, CredentialId, ProposalId, TypesError};

use crate::params::GovernableParam;
use crate::proposal::ProposalState;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("snapshot {snapshot} is before the earliest allowed start {earliest}")]
    InvalidStartCheckpoint {
        snapshot: Checkpoint,
        earliest: Checkpoint,
    },

    #[error("voting duration {duration} outside [{min}, {max}]")]
    InvalidDuration { duration: u64, min: u64, max: u64 },

    #[error("invalid choice count {count} (max {max})")]
    InvalidChoiceCount { count: usize, max: usize },

    #[error("invalid selection range: min {min}, max {max}")]
    InvalidSelectionRange { min: u8, max: u8 },

    #[error("choice label is {0} bytes, maximum is 32")]
    InvalidChoiceLabel(usize),

    #[error("proposal description reference is empty")]
    InvalidProposalDescription,

    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalId),

    #[error("proposal {0} does not exist")]
    NonexistentProposal(ProposalId),

    #[error("proposal {id} is {state}, which does not allow this action")]
    UnexpectedState { id: ProposalId, state: ProposalState },

    #[error("{0} is not authorized for this action")]
    Unauthorized(Address),

    #[error("proposal {id} is not active (currently {state})")]
    ProposalNotActive { id: ProposalId, state: ProposalState },

    #[error("{0} has already voted on this proposal")]
    AlreadyVoted(Address),

    #[error("choice selection {mask:#x} is invalid for this proposal")]
    InvalidVoteChoice { mask: u32 },

    #[error("{0} is not eligible to vote on this proposal")]
    VoterNotEligible(Address),

    #[error("credential {0} does not exist")]
    InvalidCredentialId(CredentialId),

    #[error("quorum numerator {numerator} exceeds denominator {denominator}")]
    InvalidQuorumFraction { numerator: u32, denominator: u32 },

    #[error("no value set at or before checkpoint {0}")]
    NotSetAtTimepoint(Checkpoint),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("checkpoint {attempted} precedes the latest recorded checkpoint {latest}")]
    CheckpointOutOfOrder {
        latest: Checkpoint,
        attempted: Checkpoint,
    },

    #[error("invalid value {value} for parameter {}", .param.name())]
    InvalidParameter { param: GovernableParam, value: u128 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<TypesError> for GovernanceError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidAddress(reason) => Self::InvalidAddress(reason),
            TypesError::LabelTooLong(len) => Self::InvalidChoiceLabel(len),
        }
    }
}
