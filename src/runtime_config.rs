// =============================================================================
// Simulation Configuration — run settings with serde defaults and atomic save
// =============================================================================
//
// Every field carries `#[serde(default)]` so a partial JSON file (or `{}`)
// loads with the documented defaults. Persistence uses an atomic tmp + rename
// write so a crash never leaves a half-written file behind.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BanditError;
use crate::outcome::bernoulli::validate_rates;
use crate::types::BestArmPolicy;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

pub const DEFAULT_NUM_TRIALS: usize = 10_000;

/// Arm count for `RandomRates` when none is configured.
pub const DEFAULT_RANDOM_ARMS: usize = 5;

fn default_num_trials() -> usize {
    DEFAULT_NUM_TRIALS
}

fn default_true_rates() -> Vec<f64> {
    vec![0.22, 0.24, 0.23, 0.21]
}

fn default_true() -> bool {
    true
}

// =============================================================================
// OutcomeSourceConfig
// =============================================================================

/// Which outcome strategy a run uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeSourceConfig {
    /// Replay a persisted trial x arm CSV matrix.
    Replay {
        matrix_path: PathBuf,
        /// Drop the leading row-index column (pandas layout).
        #[serde(default = "default_true")]
        index_column: bool,
    },

    /// Live Bernoulli draws from known true rates.
    LiveBernoulli {
        #[serde(default = "default_true_rates")]
        true_rates: Vec<f64>,
    },

    /// Live Bernoulli draws from rates picked uniformly at random per arm.
    RandomRates,
}

impl Default for OutcomeSourceConfig {
    fn default() -> Self {
        Self::LiveBernoulli {
            true_rates: default_true_rates(),
        }
    }
}

// =============================================================================
// SimulationConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Arm count. Derived from the outcome source when unset.
    #[serde(default)]
    pub num_arms: Option<usize>,

    #[serde(default = "default_num_trials")]
    pub num_trials: usize,

    /// Unset means a non-deterministic run.
    #[serde(default)]
    pub random_seed: Option<u64>,

    #[serde(default)]
    pub outcome_source: OutcomeSourceConfig,

    #[serde(default)]
    pub best_arm_policy: BestArmPolicy,

    /// Where the result export is written. The CLI picks a timestamped name
    /// when unset.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_arms: None,
            num_trials: default_num_trials(),
            random_seed: None,
            outcome_source: OutcomeSourceConfig::default(),
            best_arm_policy: BestArmPolicy::default(),
            output_path: None,
        }
    }
}

impl SimulationConfig {
    /// Arm count implied by the configuration.
    ///
    /// `source_arms` is the column count of an already-loaded replay matrix;
    /// it is ignored for the live modes.
    pub fn resolve_num_arms(&self, source_arms: Option<usize>) -> Result<usize, BanditError> {
        let derived = match &self.outcome_source {
            OutcomeSourceConfig::LiveBernoulli { true_rates } => Some(true_rates.len()),
            OutcomeSourceConfig::Replay { .. } => source_arms,
            OutcomeSourceConfig::RandomRates => None,
        };

        let arms = match (self.num_arms, derived) {
            (Some(n), Some(d)) if n != d => {
                return Err(BanditError::InvalidConfiguration(format!(
                    "num_arms is {n} but the outcome source provides {d} arms"
                )))
            }
            (Some(n), _) => n,
            (None, Some(d)) => d,
            (None, None) => DEFAULT_RANDOM_ARMS,
        };

        if arms < 1 {
            return Err(BanditError::InvalidConfiguration(
                "num_arms must be at least 1".into(),
            ));
        }
        Ok(arms)
    }

    /// Checks everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<(), BanditError> {
        if self.num_trials < 1 {
            return Err(BanditError::InvalidConfiguration(
                "num_trials must be at least 1".into(),
            ));
        }
        if let OutcomeSourceConfig::LiveBernoulli { true_rates } = &self.outcome_source {
            validate_rates(true_rates)?;
        }
        if self.num_arms == Some(0) {
            return Err(BanditError::InvalidConfiguration(
                "num_arms must be at least 1".into(),
            ));
        }
        if !matches!(self.outcome_source, OutcomeSourceConfig::Replay { .. }) {
            self.resolve_num_arms(None)?;
        }
        Ok(())
    }

    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read simulation config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse simulation config from {}", path.display()))?;

        info!(
            path = %path.display(),
            num_trials = config.num_trials,
            seed = ?config.random_seed,
            "simulation config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise simulation config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "simulation config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.num_trials, 10_000);
        assert_eq!(cfg.random_seed, None);
        assert_eq!(cfg.best_arm_policy, BestArmPolicy::LastSample);
        assert_eq!(cfg.resolve_num_arms(None).unwrap(), 4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: SimulationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, SimulationConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "num_trials": 500,
            "random_seed": 42,
            "outcome_source": { "kind": "replay", "matrix_path": "mab_sample.csv" }
        }"#;
        let cfg: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.num_trials, 500);
        assert_eq!(cfg.random_seed, Some(42));
        assert_eq!(
            cfg.outcome_source,
            OutcomeSourceConfig::Replay {
                matrix_path: PathBuf::from("mab_sample.csv"),
                index_column: true,
            }
        );
        assert_eq!(cfg.resolve_num_arms(Some(3)).unwrap(), 3);
    }

    #[test]
    fn arm_count_derives_from_true_rates() {
        let cfg = SimulationConfig {
            outcome_source: OutcomeSourceConfig::LiveBernoulli {
                true_rates: vec![0.1, 0.2],
            },
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.resolve_num_arms(None).unwrap(), 2);
    }

    #[test]
    fn random_rates_default_to_five_arms() {
        let cfg = SimulationConfig {
            outcome_source: OutcomeSourceConfig::RandomRates,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.resolve_num_arms(None).unwrap(), 5);
        let cfg = SimulationConfig {
            num_arms: Some(8),
            ..cfg
        };
        assert_eq!(cfg.resolve_num_arms(None).unwrap(), 8);
    }

    #[test]
    fn mismatched_arm_count_is_rejected() {
        let cfg = SimulationConfig {
            num_arms: Some(3),
            ..SimulationConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(BanditError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_trials_or_arms_rejected() {
        let cfg = SimulationConfig {
            num_trials: 0,
            ..SimulationConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SimulationConfig {
            num_arms: Some(0),
            outcome_source: OutcomeSourceConfig::RandomRates,
            ..SimulationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn out_of_range_rate_rejected() {
        let cfg = SimulationConfig {
            outcome_source: OutcomeSourceConfig::LiveBernoulli {
                true_rates: vec![0.5, 1.5],
            },
            ..SimulationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        let cfg = SimulationConfig {
            random_seed: Some(7),
            best_arm_policy: BestArmPolicy::PosteriorMean,
            ..SimulationConfig::default()
        };
        cfg.save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        let loaded = SimulationConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
    }
}
