//! Fundamental types for the Vota governance workspace.
//!
//! This crate defines the value types shared across every other crate:
//! identities, content-derived ids, checkpoints, credentials, choice labels,
//! and the level multiplier table.

pub mod address;
pub mod checkpoint;
pub mod choice;
pub mod credential;
pub mod error;
pub mod hash;
pub mod params;

pub use address::Address;
pub use checkpoint::Checkpoint;
pub use choice::ChoiceLabel;
pub use credential::{Credential, CredentialId, NodeLevel};
pub use error::TypesError;
pub use hash::ProposalId;
pub use params::LevelMultipliers;
