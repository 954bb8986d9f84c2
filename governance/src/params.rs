//! Governable parameters and their checkpoint-versioned histories.
//!
//! Every setter validates bounds before appending, so each history is always
//! well-formed. Nothing is overwritten in place: a change at checkpoint N
//! leaves every lookup before N untouched.

use serde::{Deserialize, Serialize};
use vota_types::{Checkpoint, LevelMultipliers};

use crate::checkpoints::Checkpoints;
use crate::error::GovernanceError;

/// Fixed denominator of the quorum fraction.
pub const QUORUM_DENOMINATOR: u32 = 100;

/// Width of the choice bitmask; no proposal may offer more choices.
pub const MAX_CHOICES_CAP: u8 = 32;

/// Enum of all parameters that can be changed by a settings manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernableParam {
    QuorumNumerator,
    MinStakedAmount,
    MinVotingDelay,
    MinVotingDuration,
    MaxVotingDuration,
    MaxChoices,
    LevelMultipliers,
}

impl GovernableParam {
    /// Human-readable name of this parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuorumNumerator => "quorum_numerator",
            Self::MinStakedAmount => "min_staked_amount",
            Self::MinVotingDelay => "min_voting_delay",
            Self::MinVotingDuration => "min_voting_duration",
            Self::MaxVotingDuration => "max_voting_duration",
            Self::MaxChoices => "max_choices",
            Self::LevelMultipliers => "level_multipliers",
        }
    }
}

/// Audit record of a scalar parameter change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub param: GovernableParam,
    pub old: Option<u128>,
    pub new: u128,
    pub effective_from: Checkpoint,
}

// ── Bound checks (shared by setters and config validation) ─────────────

pub fn check_quorum_numerator(value: u32) -> Result<(), GovernanceError> {
    if value > QUORUM_DENOMINATOR {
        return Err(GovernanceError::InvalidQuorumFraction {
            numerator: value,
            denominator: QUORUM_DENOMINATOR,
        });
    }
    Ok(())
}

pub fn check_min_staked_amount(value: u128) -> Result<(), GovernanceError> {
    if value == 0 {
        return Err(GovernanceError::InvalidParameter {
            param: GovernableParam::MinStakedAmount,
            value,
        });
    }
    Ok(())
}

pub fn check_voting_durations(min: u64, max: u64) -> Result<(), GovernanceError> {
    if min == 0 || min > max {
        return Err(GovernanceError::InvalidDuration {
            duration: min,
            min: 1,
            max,
        });
    }
    Ok(())
}

pub fn check_max_choices(value: u8) -> Result<(), GovernanceError> {
    if value == 0 || value > MAX_CHOICES_CAP {
        return Err(GovernanceError::InvalidChoiceCount {
            count: value as usize,
            max: MAX_CHOICES_CAP as usize,
        });
    }
    Ok(())
}

/// Initial values installed when an engine is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialParams {
    pub quorum_numerator: u32,
    pub min_staked_amount: u128,
    pub min_voting_delay: u64,
    pub min_voting_duration: u64,
    pub max_voting_duration: u64,
    pub max_choices: u8,
    pub level_multipliers: LevelMultipliers,
}

impl InitialParams {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        check_quorum_numerator(self.quorum_numerator)?;
        check_min_staked_amount(self.min_staked_amount)?;
        check_voting_durations(self.min_voting_duration, self.max_voting_duration)?;
        check_max_choices(self.max_choices)
    }
}

/// The full set of versioned parameter histories.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceParams {
    pub(crate) quorum_numerator: Checkpoints<u32>,
    pub(crate) min_staked_amount: Checkpoints<u128>,
    min_voting_delay: Checkpoints<u64>,
    min_voting_duration: Checkpoints<u64>,
    max_voting_duration: Checkpoints<u64>,
    pub(crate) max_choices: Checkpoints<u8>,
    level_multipliers: Checkpoints<LevelMultipliers>,
}

impl GovernanceParams {
    /// Install validated initial values, effective from `genesis`.
    pub fn new(initial: InitialParams, genesis: Checkpoint) -> Result<Self, GovernanceError> {
        initial.validate()?;
        Ok(Self {
            quorum_numerator: Checkpoints::with_initial(genesis, initial.quorum_numerator),
            min_staked_amount: Checkpoints::with_initial(genesis, initial.min_staked_amount),
            min_voting_delay: Checkpoints::with_initial(genesis, initial.min_voting_delay),
            min_voting_duration: Checkpoints::with_initial(genesis, initial.min_voting_duration),
            max_voting_duration: Checkpoints::with_initial(genesis, initial.max_voting_duration),
            max_choices: Checkpoints::with_initial(genesis, initial.max_choices),
            level_multipliers: Checkpoints::with_initial(genesis, initial.level_multipliers),
        })
    }

    pub fn quorum_numerator(&self, at: Checkpoint) -> Result<u32, GovernanceError> {
        self.quorum_numerator.get_at(at).copied()
    }

    pub fn min_staked_amount(&self, at: Checkpoint) -> Result<u128, GovernanceError> {
        self.min_staked_amount.get_at(at).copied()
    }

    pub fn min_voting_delay(&self, at: Checkpoint) -> Result<u64, GovernanceError> {
        self.min_voting_delay.get_at(at).copied()
    }

    pub fn min_voting_duration(&self, at: Checkpoint) -> Result<u64, GovernanceError> {
        self.min_voting_duration.get_at(at).copied()
    }

    pub fn max_voting_duration(&self, at: Checkpoint) -> Result<u64, GovernanceError> {
        self.max_voting_duration.get_at(at).copied()
    }

    pub fn max_choices(&self, at: Checkpoint) -> Result<u8, GovernanceError> {
        self.max_choices.get_at(at).copied()
    }

    pub fn level_multipliers(&self, at: Checkpoint) -> Result<&LevelMultipliers, GovernanceError> {
        self.level_multipliers.get_at(at)
    }

    pub fn quorum_numerator_history(&self) -> &Checkpoints<u32> {
        &self.quorum_numerator
    }

    /// Re-check every history against the bounds the setters enforce.
    ///
    /// Used on decoded state, which never went through the setters.
    pub fn check_histories(&self) -> Result<(), GovernanceError> {
        fn ordered<T>(
            param: GovernableParam,
            history: &Checkpoints<T>,
        ) -> Result<(), GovernanceError> {
            if history.is_empty() || !history.is_ordered() {
                return Err(GovernanceError::Serialization(format!(
                    "{} history is empty or out of order",
                    param.name()
                )));
            }
            Ok(())
        }

        ordered(GovernableParam::QuorumNumerator, &self.quorum_numerator)?;
        ordered(GovernableParam::MinStakedAmount, &self.min_staked_amount)?;
        ordered(GovernableParam::MinVotingDelay, &self.min_voting_delay)?;
        ordered(GovernableParam::MinVotingDuration, &self.min_voting_duration)?;
        ordered(GovernableParam::MaxVotingDuration, &self.max_voting_duration)?;
        ordered(GovernableParam::MaxChoices, &self.max_choices)?;
        ordered(GovernableParam::LevelMultipliers, &self.level_multipliers)?;

        for (_, value) in self.quorum_numerator.iter() {
            check_quorum_numerator(*value)?;
        }
        for (_, value) in self.min_staked_amount.iter() {
            check_min_staked_amount(*value)?;
        }
        for (_, value) in self.max_choices.iter() {
            check_max_choices(*value)?;
        }
        for (at, min) in self.min_voting_duration.iter() {
            check_voting_durations(*min, self.max_voting_duration(*at)?)?;
        }
        for (at, max) in self.max_voting_duration.iter() {
            check_voting_durations(self.min_voting_duration(*at)?, *max)?;
        }
        Ok(())
    }

    // ── Setters ──────────────────────────────────────────────────────────

    pub fn set_quorum_numerator(
        &mut self,
        value: u32,
        at: Checkpoint,
    ) -> Result<ParameterChange, GovernanceError> {
        check_quorum_numerator(value)?;
        let old = self.quorum_numerator.push(at, value)?;
        Ok(change(GovernableParam::QuorumNumerator, old.map(u128::from), value.into(), at))
    }

    pub fn set_min_staked_amount(
        &mut self,
        value: u128,
        at: Checkpoint,
    ) -> Result<ParameterChange, GovernanceError> {
        check_min_staked_amount(value)?;
        let old = self.min_staked_amount.push(at, value)?;
        Ok(change(GovernableParam::MinStakedAmount, old, value, at))
    }

    pub fn set_min_voting_delay(
        &mut self,
        value: u64,
        at: Checkpoint,
    ) -> Result<ParameterChange, GovernanceError> {
        let old = self.min_voting_delay.push(at, value)?;
        Ok(change(GovernableParam::MinVotingDelay, old.map(u128::from), value.into(), at))
    }

    pub fn set_min_voting_duration(
        &mut self,
        value: u64,
        at: Checkpoint,
    ) -> Result<ParameterChange, GovernanceError> {
        let max = self.max_voting_duration(at)?;
        check_voting_durations(value, max)?;
        let old = self.min_voting_duration.push(at, value)?;
        Ok(change(GovernableParam::MinVotingDuration, old.map(u128::from), value.into(), at))
    }

    pub fn set_max_voting_duration(
        &mut self,
        value: u64,
        at: Checkpoint,
    ) -> Result<ParameterChange, GovernanceError> {
        let min = self.min_voting_duration(at)?;
        if value < min {
            return Err(GovernanceError::InvalidDuration {
                duration: value,
                min,
                max: u64::MAX,
            });
        }
        let old = self.max_voting_duration.push(at, value)?;
        Ok(change(GovernableParam::MaxVotingDuration, old.map(u128::from), value.into(), at))
    }

    pub fn set_max_choices(
        &mut self,
        value: u8,
        at: Checkpoint,
    ) -> Result<ParameterChange, GovernanceError> {
        check_max_choices(value)?;
        let old = self.max_choices.push(at, value)?;
        Ok(change(GovernableParam::MaxChoices, old.map(u128::from), value.into(), at))
    }

    /// Replace the multiplier table from `at` onward, returning the previous table.
    pub fn set_level_multipliers(
        &mut self,
        table: LevelMultipliers,
        at: Checkpoint,
    ) -> Result<Option<LevelMultipliers>, GovernanceError> {
        self.level_multipliers.push(at, table)
    }
}

fn change(param: GovernableParam, old: Option<u128>, new: u128, at: Checkpoint) -> ParameterChange {
    ParameterChange {
        param,
        old,
        new,
        effective_from: at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vota_types::NodeLevel;

    fn initial() -> InitialParams {
        InitialParams {
            quorum_numerator: 20,
            min_staked_amount: 1_000_000,
            min_voting_delay: 1,
            min_voting_duration: 10,
            max_voting_duration: 1_000,
            max_choices: 32,
            level_multipliers: LevelMultipliers::reference(),
        }
    }

    fn cp(n: u64) -> Checkpoint {
        Checkpoint::new(n)
    }

    #[test]
    fn initial_values_apply_from_genesis_only() {
        let params = GovernanceParams::new(initial(), cp(5)).unwrap();
        assert_eq!(params.quorum_numerator(cp(5)).unwrap(), 20);
        assert!(matches!(
            params.quorum_numerator(cp(4)),
            Err(GovernanceError::NotSetAtTimepoint(_))
        ));
    }

    #[test]
    fn invalid_initial_values_are_rejected() {
        let mut bad = initial();
        bad.quorum_numerator = 101;
        assert!(matches!(
            GovernanceParams::new(bad, cp(0)),
            Err(GovernanceError::InvalidQuorumFraction { .. })
        ));

        let mut bad = initial();
        bad.min_voting_duration = 2_000;
        assert!(matches!(
            GovernanceParams::new(bad, cp(0)),
            Err(GovernanceError::InvalidDuration { .. })
        ));

        let mut bad = initial();
        bad.max_choices = 33;
        assert!(matches!(
            GovernanceParams::new(bad, cp(0)),
            Err(GovernanceError::InvalidChoiceCount { .. })
        ));
    }

    #[test]
    fn quorum_update_records_old_and_new() {
        let mut params = GovernanceParams::new(initial(), cp(0)).unwrap();
        let change = params.set_quorum_numerator(75, cp(10)).unwrap();
        assert_eq!(change.param, GovernableParam::QuorumNumerator);
        assert_eq!(change.old, Some(20));
        assert_eq!(change.new, 75);
        assert_eq!(params.quorum_numerator(cp(9)).unwrap(), 20);
        assert_eq!(params.quorum_numerator(cp(10)).unwrap(), 75);
    }

    #[test]
    fn quorum_above_denominator_is_rejected() {
        let mut params = GovernanceParams::new(initial(), cp(0)).unwrap();
        assert!(matches!(
            params.set_quorum_numerator(101, cp(1)),
            Err(GovernanceError::InvalidQuorumFraction { numerator: 101, denominator: 100 })
        ));
        assert_eq!(params.quorum_numerator_history().len(), 1);
    }

    #[test]
    fn duration_bounds_stay_consistent() {
        let mut params = GovernanceParams::new(initial(), cp(0)).unwrap();
        assert!(params.set_min_voting_duration(0, cp(1)).is_err());
        assert!(params.set_min_voting_duration(1_001, cp(1)).is_err());
        assert!(params.set_max_voting_duration(9, cp(1)).is_err());
        params.set_max_voting_duration(10, cp(1)).unwrap();
        params.set_min_voting_duration(10, cp(1)).unwrap();
        assert_eq!(params.max_voting_duration(cp(1)).unwrap(), 10);
    }

    #[test]
    fn zero_min_stake_is_rejected() {
        let mut params = GovernanceParams::new(initial(), cp(0)).unwrap();
        assert!(matches!(
            params.set_min_staked_amount(0, cp(1)),
            Err(GovernanceError::InvalidParameter { param: GovernableParam::MinStakedAmount, .. })
        ));
    }

    #[test]
    fn multiplier_table_is_versioned() {
        let mut params = GovernanceParams::new(initial(), cp(0)).unwrap();
        let mut table = LevelMultipliers::reference();
        table.set(NodeLevel::Strength, 200);
        let old = params.set_level_multipliers(table, cp(7)).unwrap();
        assert_eq!(old, Some(LevelMultipliers::reference()));
        assert_eq!(params.level_multipliers(cp(6)).unwrap().get(NodeLevel::Strength), 100);
        assert_eq!(params.level_multipliers(cp(7)).unwrap().get(NodeLevel::Strength), 200);
    }

    #[test]
    fn histories_built_by_setters_pass_the_check() {
        let mut params = GovernanceParams::new(initial(), cp(0)).unwrap();
        params.set_quorum_numerator(40, cp(3)).unwrap();
        params.set_max_voting_duration(20, cp(4)).unwrap();
        params.set_min_voting_duration(20, cp(4)).unwrap();
        assert!(params.check_histories().is_ok());
    }

    #[test]
    fn zero_min_stake_history_fails_the_check() {
        let mut params = GovernanceParams::new(initial(), cp(0)).unwrap();
        params.min_staked_amount = Checkpoints::with_initial(cp(0), 0);
        assert!(matches!(
            params.check_histories(),
            Err(GovernanceError::InvalidParameter { param: GovernableParam::MinStakedAmount, .. })
        ));
    }

    #[test]
    fn setters_reject_checkpoints_in_the_past() {
        let mut params = GovernanceParams::new(initial(), cp(10)).unwrap();
        assert!(matches!(
            params.set_max_choices(4, cp(9)),
            Err(GovernanceError::CheckpointOutOfOrder { .. })
        ));
    }
}
