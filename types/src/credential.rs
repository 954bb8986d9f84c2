//! Weighted governance credentials ("nodes").

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a credential on the credential ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CredentialId(u64);

impl CredentialId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Credential tier. Base tiers and "X" tiers carry distinct multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeLevel {
    Strength,
    Thunder,
    Mjolnir,
    VeThorX,
    StrengthX,
    ThunderX,
    MjolnirX,
}

impl NodeLevel {
    pub const ALL: [NodeLevel; 7] = [
        NodeLevel::Strength,
        NodeLevel::Thunder,
        NodeLevel::Mjolnir,
        NodeLevel::VeThorX,
        NodeLevel::StrengthX,
        NodeLevel::ThunderX,
        NodeLevel::MjolnirX,
    ];

    /// Whether this is one of the "X" tiers.
    pub fn is_x(&self) -> bool {
        matches!(
            self,
            Self::VeThorX | Self::StrengthX | Self::ThunderX | Self::MjolnirX
        )
    }

    /// Stake backing one credential of this level in the reference table.
    ///
    /// X tiers carry the base stake plus the `VeThorX` stake.
    pub fn reference_stake(&self) -> u128 {
        const UNIT: u128 = 1_000_000;
        const X_BONUS: u128 = 680_000;
        match self {
            Self::Strength => UNIT,
            Self::Thunder => 2 * UNIT,
            Self::Mjolnir => 4 * UNIT,
            Self::VeThorX => X_BONUS,
            Self::StrengthX => UNIT + X_BONUS,
            Self::ThunderX => 2 * UNIT + X_BONUS,
            Self::MjolnirX => 4 * UNIT + X_BONUS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Thunder => "thunder",
            Self::Mjolnir => "mjolnir",
            Self::VeThorX => "vethor_x",
            Self::StrengthX => "strength_x",
            Self::ThunderX => "thunder_x",
            Self::MjolnirX => "mjolnir_x",
        }
    }
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A credential as reported by the credential ledger at some checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    pub level: NodeLevel,
    pub owner: crate::Address,
    /// Terminal manager: the owner unless the credential is delegated.
    pub manager: crate::Address,
    pub minted_at: crate::Checkpoint,
}

impl Credential {
    pub fn is_delegated(&self) -> bool {
        self.owner != self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_tiers_are_flagged() {
        let x: Vec<_> = NodeLevel::ALL.iter().filter(|l| l.is_x()).collect();
        assert_eq!(x.len(), 4);
        assert!(!NodeLevel::Strength.is_x());
        assert!(NodeLevel::MjolnirX.is_x());
    }

    #[test]
    fn x_stake_is_base_plus_bonus() {
        assert_eq!(
            NodeLevel::MjolnirX.reference_stake() - NodeLevel::Mjolnir.reference_stake(),
            NodeLevel::VeThorX.reference_stake()
        );
    }
}
