//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use vota_types::LevelMultipliers;
use vota_utils::LoggingConfig;

use crate::error::GovernanceError;
use crate::params::{InitialParams, MAX_CHOICES_CAP};

/// Configuration for a [`GovernanceEngine`](crate::GovernanceEngine).
///
/// Every scalar here is the value installed at the checkpoint the engine is
/// created; later changes go through the engine's gated setters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Checkpoints that must separate proposal creation from its snapshot.
    #[serde(default = "default_min_voting_delay")]
    pub min_voting_delay: u64,

    #[serde(default = "default_min_voting_duration")]
    pub min_voting_duration: u64,

    #[serde(default = "default_max_voting_duration")]
    pub max_voting_duration: u64,

    #[serde(default = "default_max_choices")]
    pub max_choices: u8,

    /// Percentage of total network weight required for quorum.
    #[serde(default = "default_quorum_numerator")]
    pub quorum_numerator: u32,

    /// Divisor applied to summed stake before normalization.
    #[serde(default = "default_min_staked_amount")]
    pub min_staked_amount: u64,

    /// Raw (pre-normalization) weight added for an endorsed validator.
    #[serde(default = "default_validator_weight")]
    pub validator_weight: u64,

    #[serde(default)]
    pub level_multipliers: LevelMultipliers,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_min_voting_delay() -> u64 {
    1
}

fn default_min_voting_duration() -> u64 {
    10
}

fn default_max_voting_duration() -> u64 {
    60_480
}

fn default_max_choices() -> u8 {
    MAX_CHOICES_CAP
}

fn default_quorum_numerator() -> u32 {
    20
}

fn default_min_staked_amount() -> u64 {
    1_000_000
}

fn default_validator_weight() -> u64 {
    500
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GovernanceError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Check every bound the engine's setters would enforce.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        self.initial_params().validate()
    }

    pub fn initial_params(&self) -> InitialParams {
        InitialParams {
            quorum_numerator: self.quorum_numerator,
            min_staked_amount: self.min_staked_amount.into(),
            min_voting_delay: self.min_voting_delay,
            min_voting_duration: self.min_voting_duration,
            max_voting_duration: self.max_voting_duration,
            max_choices: self.max_choices,
            level_multipliers: self.level_multipliers.clone(),
        }
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            min_voting_delay: default_min_voting_delay(),
            min_voting_duration: default_min_voting_duration(),
            max_voting_duration: default_max_voting_duration(),
            max_choices: default_max_choices(),
            quorum_numerator: default_quorum_numerator(),
            min_staked_amount: default_min_staked_amount(),
            validator_weight: default_validator_weight(),
            level_multipliers: LevelMultipliers::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vota_utils::LogFormat;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = GovernanceConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = GovernanceConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = GovernanceConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.quorum_numerator, 20);
        assert_eq!(config.max_choices, 32);
        assert_eq!(config.level_multipliers, LevelMultipliers::reference());
        assert_eq!(config.logging.format, LogFormat::Human);
        config.validate().unwrap();
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            quorum_numerator = 75
            validator_weight = 1000

            [level_multipliers]
            mjolnir_x = 800

            [logging]
            format = "json"
            level = "debug"
        "#;
        let config = GovernanceConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.quorum_numerator, 75);
        assert_eq!(config.validator_weight, 1000);
        assert_eq!(config.level_multipliers.mjolnir_x, 800);
        assert_eq!(config.level_multipliers.strength, 100);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.min_voting_duration, 10);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = GovernanceConfig {
            quorum_numerator: 101,
            ..GovernanceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GovernanceError::InvalidQuorumFraction { .. })
        ));

        config.quorum_numerator = 20;
        config.min_voting_duration = 100;
        config.max_voting_duration = 50;
        assert!(matches!(config.validate(), Err(GovernanceError::InvalidDuration { .. })));

        config.max_voting_duration = 100;
        config.max_choices = 33;
        assert!(matches!(config.validate(), Err(GovernanceError::InvalidChoiceCount { .. })));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_voting_delay = 3").unwrap();
        let config = GovernanceConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.min_voting_delay, 3);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = GovernanceConfig::from_toml_file("/nonexistent/vota.toml");
        assert!(matches!(result, Err(GovernanceError::Config(_))));
    }

    #[test]
    fn malformed_toml_returns_config_error() {
        let result = GovernanceConfig::from_toml_str("quorum_numerator = \"lots\"");
        assert!(matches!(result, Err(GovernanceError::Config(_))));
    }
}
