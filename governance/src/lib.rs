//! Stake-weighted governance core.
//!
//! Proposals carry a ballot of up to 32 labelled choices and a voting window
//! anchored at a snapshot checkpoint. Voting power is resolved from node
//! credentials at that snapshot, so transfers and delegations after it never
//! change a proposal's outcome. Quorum is a versioned fraction of the whole
//! network's weight.
//!
//! Every governable parameter is an append-only checkpoint history; reads
//! for a past checkpoint always see the value that was in force then.
//!
//! The engine talks to the outside world only through three collaborator
//! traits: [`CredentialLedger`], [`SnapshotClock`] and [`Authorizer`].

pub mod auth;
pub mod checkpoints;
pub mod choice;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod params;
pub mod power;
pub mod proposal;
pub mod quorum;
pub mod state;
pub mod tally;

pub use auth::{Authorizer, Role};
pub use checkpoints::Checkpoints;
pub use choice::ChoiceMask;
pub use clock::SnapshotClock;
pub use config::GovernanceConfig;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use event::{EventBus, GovernanceEvent};
pub use ledger::CredentialLedger;
pub use params::{GovernableParam, GovernanceParams, InitialParams, ParameterChange};
pub use power::{VotingPower, VotingPowerResolver, NORMALIZATION};
pub use proposal::{NewProposal, Proposal, ProposalState};
pub use quorum::QuorumEngine;
pub use state::GovernanceState;
pub use tally::{ProposalTally, Vote, VoteTally};
