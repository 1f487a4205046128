// =============================================================================
// Trial Recorder & Result Export
// =============================================================================
//
// The recorder is the append-only per-trial history of a run. Once the run
// finishes it is flattened into a `ResultExport`: one JSON field per list,
// with the cumulative regret series carrying a leading 0.
//
// Exports contain no timestamps or ids, so two seeded runs with the same
// configuration serialise to identical bytes.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BanditError;
use crate::types::{BestArmPolicy, SimulationResult, TrialRecord};

// =============================================================================
// TrialRecorder
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct TrialRecorder {
    records: Vec<TrialRecord>,
}

impl TrialRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(trials: usize) -> Self {
        Self {
            records: Vec::with_capacity(trials),
        }
    }

    /// Append the next record. Indices must arrive as 0, 1, 2, ...
    pub fn push(&mut self, record: TrialRecord) -> Result<(), BanditError> {
        let expected = self.records.len();
        if record.trial_index != expected {
            return Err(BanditError::TrialOutOfOrder {
                expected,
                got: record.trial_index,
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn into_records(self) -> Vec<TrialRecord> {
        self.records
    }
}

// =============================================================================
// ResultExport
// =============================================================================

/// Serialised form of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultExport {
    pub num_arms: usize,
    pub num_trials: usize,
    pub successes: Vec<u64>,
    pub fails: Vec<u64>,
    pub trial_outcomes: Vec<u8>,
    pub chosen_arm: Vec<usize>,
    pub instantaneous_regret: Vec<f64>,
    /// Length `num_trials + 1`, first element 0.
    pub cumulative_regret: Vec<f64>,
    pub best_arm: usize,
    pub best_arm_policy: BestArmPolicy,
    pub posterior_means: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_rates: Option<Vec<f64>>,
}

impl ResultExport {
    pub fn from_result(result: &SimulationResult, true_rates: Option<&[f64]>) -> Self {
        Self {
            num_arms: result.num_arms(),
            num_trials: result.num_trials(),
            successes: result.successes.clone(),
            fails: result.fails.clone(),
            trial_outcomes: result.trials.iter().map(|t| t.outcome).collect(),
            chosen_arm: result.trials.iter().map(|t| t.chosen_arm).collect(),
            instantaneous_regret: result
                .trials
                .iter()
                .map(|t| t.instantaneous_regret)
                .collect(),
            cumulative_regret: result.cumulative_regret(),
            best_arm: result.best_arm,
            best_arm_policy: result.best_arm_policy,
            posterior_means: result.posterior_means.clone(),
            true_rates: true_rates.map(<[f64]>::to_vec),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialise result export to JSON")
    }

    /// Atomic write: `.tmp` sibling, then rename.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_json()?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp results to {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp results to {}", path.display()))?;

        info!(path = %path.display(), best_arm = self.best_arm, "results saved (atomic)");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read results from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse results from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(i: usize, arm: usize, outcome: u8, inst: f64, cum: f64) -> TrialRecord {
        TrialRecord {
            trial_index: i,
            chosen_arm: arm,
            outcome,
            instantaneous_regret: inst,
            cumulative_regret_after: cum,
        }
    }

    #[test]
    fn recorder_enforces_order() {
        let mut r = TrialRecorder::new();
        r.push(record(0, 0, 1, 0.0, 0.0)).unwrap();
        let err = r.push(record(2, 0, 1, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, BanditError::TrialOutOfOrder {
            expected: 1,
            got: 2,
        });
        r.push(record(1, 1, 0, 0.1, 0.1)).unwrap();
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn export_flattens_history() {
        let result = SimulationResult {
            successes: vec![1, 0],
            fails: vec![0, 1],
            trials: vec![record(0, 0, 1, 0.0, 0.0), record(1, 1, 0, 0.25, 0.25)],
            best_arm: 0,
            best_arm_policy: BestArmPolicy::LastSample,
            posterior_means: vec![2.0 / 3.0, 1.0 / 3.0],
        };
        let export = ResultExport::from_result(&result, Some(&[0.9, 0.1]));
        assert_eq!(export.num_trials, 2);
        assert_eq!(export.trial_outcomes, vec![1, 0]);
        assert_eq!(export.chosen_arm, vec![0, 1]);
        assert_eq!(export.instantaneous_regret, vec![0.0, 0.25]);
        assert_eq!(export.cumulative_regret, vec![0.0, 0.0, 0.25]);
        assert_eq!(export.true_rates, Some(vec![0.9, 0.1]));
    }

    #[test]
    fn export_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thompson_results.json");
        let result = SimulationResult {
            successes: vec![3],
            fails: vec![1],
            trials: (0..4).map(|i| record(i, 0, u8::from(i != 2), 0.0, 0.0)).collect(),
            best_arm: 0,
            best_arm_policy: BestArmPolicy::PosteriorMean,
            posterior_means: vec![0.75],
        };
        let export = ResultExport::from_result(&result, None);
        export.save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("true_rates"));
        assert!(text.contains("\"posterior-mean\""));
        assert_eq!(ResultExport::load(&path).unwrap(), export);
    }
}
