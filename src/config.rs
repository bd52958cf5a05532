//! Engine configuration, read from a TOML file. Every field has a default so
//! that a partial file (or none at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// The number of preliminary rounds held in every division.
    pub num_prelims: u32,
    pub pairing: PairingConfig,
    pub judging: JudgingConfig,
    /// Seed for the random source. When unset, binaries seed from the OS.
    pub seed: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PairingConfig {
    /// A single pairing attempt gives up after `iteration_factor` times the
    /// roster size.
    pub iteration_factor: usize,
    /// How many times a round is redrawn from scratch after an attempt runs
    /// out of iterations.
    pub max_restarts: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct JudgingConfig {
    /// Judges per elimination debate.
    pub panel_size: usize,
    /// Maximum preliminary assignments per judge. Defaults to the number of
    /// preliminary rounds.
    pub prelim_cap: Option<u32>,
    /// Random draws per judge slot. Defaults to the judge pool size plus one.
    pub attempts_per_slot: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_prelims: 4,
            pairing: PairingConfig::default(),
            judging: JudgingConfig::default(),
            seed: None,
        }
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            iteration_factor: 100,
            max_restarts: 50,
        }
    }
}

impl Default for JudgingConfig {
    fn default() -> Self {
        Self {
            panel_size: 3,
            prelim_cap: None,
            attempts_per_slot: None,
        }
    }
}

impl JudgingConfig {
    /// The preliminary load cap for a tournament of `num_prelims` rounds.
    pub fn prelim_cap(&self, num_prelims: u32) -> u32 {
        self.prelim_cap.unwrap_or(num_prelims)
    }
}

impl PairingConfig {
    pub fn max_iterations(&self, roster_size: usize) -> usize {
        self.iteration_factor.saturating_mul(roster_size.max(1))
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_prelims == 0 {
            return Err(ConfigError::Invalid(
                "num_prelims must be at least 1".to_string(),
            ));
        }
        if self.pairing.iteration_factor == 0 {
            return Err(ConfigError::Invalid(
                "pairing.iteration_factor must be at least 1".to_string(),
            ));
        }
        if self.judging.panel_size == 0 {
            return Err(ConfigError::Invalid(
                "judging.panel_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
