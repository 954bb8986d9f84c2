//! Level multiplier table, one of the governable, checkpoint-versioned parameters.

use crate::credential::NodeLevel;
use serde::{Deserialize, Serialize};

/// Per-level voting multipliers, in percent (100 = 1×).
///
/// Base tiers and X tiers are configured independently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMultipliers {
    // ── Base tiers ───────────────────────────────────────────────────────
    #[serde(default = "default_base")]
    pub strength: u32,
    #[serde(default = "default_base")]
    pub thunder: u32,
    #[serde(default = "default_base")]
    pub mjolnir: u32,

    // ── X tiers ──────────────────────────────────────────────────────────
    #[serde(default = "default_x")]
    pub vethor_x: u32,
    #[serde(default = "default_x")]
    pub strength_x: u32,
    #[serde(default = "default_x")]
    pub thunder_x: u32,
    #[serde(default = "default_x")]
    pub mjolnir_x: u32,
}

fn default_base() -> u32 {
    LevelMultipliers::REFERENCE_BASE
}

fn default_x() -> u32 {
    LevelMultipliers::REFERENCE_X
}

impl LevelMultipliers {
    pub const REFERENCE_BASE: u32 = 100;
    pub const REFERENCE_X: u32 = 500;

    /// The reference table: 100 for base tiers, 500 for X tiers.
    pub fn reference() -> Self {
        Self::uniform(Self::REFERENCE_BASE, Self::REFERENCE_X)
    }

    /// One multiplier for every base tier and one for every X tier.
    pub fn uniform(base: u32, x: u32) -> Self {
        Self {
            strength: base,
            thunder: base,
            mjolnir: base,
            vethor_x: x,
            strength_x: x,
            thunder_x: x,
            mjolnir_x: x,
        }
    }

    pub fn get(&self, level: NodeLevel) -> u32 {
        match level {
            NodeLevel::Strength => self.strength,
            NodeLevel::Thunder => self.thunder,
            NodeLevel::Mjolnir => self.mjolnir,
            NodeLevel::VeThorX => self.vethor_x,
            NodeLevel::StrengthX => self.strength_x,
            NodeLevel::ThunderX => self.thunder_x,
            NodeLevel::MjolnirX => self.mjolnir_x,
        }
    }

    pub fn set(&mut self, level: NodeLevel, multiplier: u32) {
        let slot = match level {
            NodeLevel::Strength => &mut self.strength,
            NodeLevel::Thunder => &mut self.thunder,
            NodeLevel::Mjolnir => &mut self.mjolnir,
            NodeLevel::VeThorX => &mut self.vethor_x,
            NodeLevel::StrengthX => &mut self.strength_x,
            NodeLevel::ThunderX => &mut self.thunder_x,
            NodeLevel::MjolnirX => &mut self.mjolnir_x,
        };
        *slot = multiplier;
    }
}

impl Default for LevelMultipliers {
    fn default() -> Self {
        Self::reference()
    }
}
