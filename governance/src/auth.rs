//! Capability checks.
//!
//! Each mutating engine operation declares the roles it accepts; the host
//! supplies the membership test through an [`Authorizer`].

use serde::{Deserialize, Serialize};
use std::fmt;
use vota_types::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Cancels active proposals and may do anything the other roles can.
    Admin,
    /// Executes succeeded proposals.
    Executor,
    /// Whitelisted to create proposals.
    Proposer,
    /// Changes governable parameters.
    SettingsManager,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::Executor => "executor",
            Self::Proposer => "proposer",
            Self::SettingsManager => "settings_manager",
        };
        f.write_str(name)
    }
}

pub trait Authorizer {
    fn has_role(&self, role: Role, who: &Address) -> bool;

    /// Whether `who` holds at least one of `roles`.
    fn has_any_role(&self, roles: &[Role], who: &Address) -> bool {
        roles.iter().any(|role| self.has_role(*role, who))
    }
}
