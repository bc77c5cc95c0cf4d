use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::forced::ForcedOutcomes;
use crate::win_prob::ProbabilityMode;

/// Settings for one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of simulated tournaments
    pub iterations: u64,

    pub mode: ProbabilityMode,

    /// Teams guaranteed to reach each round
    pub forced: ForcedOutcomes,

    /// Participant whose winning trials are examined
    pub win_check: Option<String>,

    /// Keep example trials won by `win_check`
    pub examples: bool,

    pub max_examples: usize,

    /// Count how often each team reaches each round when `win_check` wins
    pub advanced: bool,

    /// Seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            iterations: 10_000,
            mode: ProbabilityMode::default(),
            forced: ForcedOutcomes::default(),
            win_check: None,
            examples: false,
            max_examples: 10,
            advanced: false,
            seed: None,
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if self.iterations == 0 {
            return Err(PoolError::InvalidConfig("iterations must be positive".to_string()));
        }
        if self.win_check.is_none() && (self.examples || self.advanced) {
            return Err(PoolError::InvalidConfig(
                "examples and round analytics need a participant to check".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::Round;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: RunConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.iterations, 10_000);
        assert_eq!(config.mode, ProbabilityMode::Scaled);
        assert!(config.forced.is_empty());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "iterations": 500,
            "mode": "even",
            "win_check": "Stephen",
            "advanced": true,
            "forced": { "final_4": ["Baylor"] }
        }"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.iterations, 500);
        assert_eq!(config.mode, ProbabilityMode::Even);
        assert_eq!(config.win_check.as_deref(), Some("Stephen"));
        assert!(config.forced.forces(Round::FinalFour, "Baylor"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let config = RunConfig {
            iterations: 0,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RunConfig {
            advanced: true,
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
