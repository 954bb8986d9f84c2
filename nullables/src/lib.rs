//! Nullable infrastructure for deterministic testing.
//!
//! The governance engine reaches the outside world only through its
//! collaborator traits. This crate provides in-memory implementations that:
//! - Return deterministic values
//! - Can be driven programmatically through `&self`, so a test can keep
//!   steering them after handing them to an engine
//! - Never touch the filesystem or network

pub mod auth;
pub mod clock;
pub mod ledger;

pub use auth::NullAuthorizer;
pub use clock::NullClock;
pub use ledger::NullCredentialLedger;
