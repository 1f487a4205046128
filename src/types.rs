// =============================================================================
// Shared types used across the Thompson bandit simulator
// =============================================================================

use serde::{Deserialize, Serialize};

/// Binary result of testing one arm in one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a raw 0/1 cell. Anything else is rejected, never coerced.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Failure),
            1 => Some(Self::Success),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            Self::Failure => 0,
            Self::Success => 1,
        }
    }
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// How the final best arm is chosen once all trials have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BestArmPolicy {
    /// Argmax of one last Thompson draw from every posterior.
    LastSample,
    /// Argmax of `alpha / (alpha + beta)`. Lower variance, opt-in only.
    PosteriorMean,
}

impl Default for BestArmPolicy {
    fn default() -> Self {
        Self::LastSample
    }
}

impl std::fmt::Display for BestArmPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastSample => write!(f, "last-sample"),
            Self::PosteriorMean => write!(f, "posterior-mean"),
        }
    }
}

impl std::str::FromStr for BestArmPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-sample" | "last_sample" => Ok(Self::LastSample),
            "posterior-mean" | "posterior_mean" | "mean" => Ok(Self::PosteriorMean),
            other => Err(format!("unknown best-arm policy '{other}'")),
        }
    }
}

/// One row of the append-only trial history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_index: usize,
    pub chosen_arm: usize,
    /// 0 or 1.
    pub outcome: u8,
    /// `max(samples) - samples[chosen_arm]`, always >= 0.
    pub instantaneous_regret: f64,
    pub cumulative_regret_after: f64,
}

/// Everything a finished run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub successes: Vec<u64>,
    pub fails: Vec<u64>,
    pub trials: Vec<TrialRecord>,
    pub best_arm: usize,
    pub best_arm_policy: BestArmPolicy,
    /// Posterior mean per arm after the last trial.
    pub posterior_means: Vec<f64>,
}

impl SimulationResult {
    pub fn num_arms(&self) -> usize {
        self.successes.len()
    }

    pub fn num_trials(&self) -> usize {
        self.trials.len()
    }

    /// Running regret total with a leading 0, one entry longer than `trials`.
    pub fn cumulative_regret(&self) -> Vec<f64> {
        std::iter::once(0.0)
            .chain(self.trials.iter().map(|t| t.cumulative_regret_after))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_rejects_non_binary_values() {
        assert_eq!(Outcome::from_raw(0), Some(Outcome::Failure));
        assert_eq!(Outcome::from_raw(1), Some(Outcome::Success));
        assert_eq!(Outcome::from_raw(2), None);
        assert_eq!(Outcome::from_raw(255), None);
    }

    #[test]
    fn policy_parses_and_displays() {
        assert_eq!("posterior-mean".parse::<BestArmPolicy>(), Ok(BestArmPolicy::PosteriorMean));
        assert_eq!("LAST_SAMPLE".parse::<BestArmPolicy>(), Ok(BestArmPolicy::LastSample));
        assert!("greedy".parse::<BestArmPolicy>().is_err());
        assert_eq!(BestArmPolicy::default().to_string(), "last-sample");
    }

    #[test]
    fn policy_serialises_kebab_case() {
        let json = serde_json::to_string(&BestArmPolicy::PosteriorMean).unwrap();
        assert_eq!(json, "\"posterior-mean\"");
    }

    #[test]
    fn cumulative_regret_starts_at_zero() {
        let result = SimulationResult {
            successes: vec![1],
            fails: vec![1],
            trials: vec![
                TrialRecord {
                    trial_index: 0,
                    chosen_arm: 0,
                    outcome: 1,
                    instantaneous_regret: 0.0,
                    cumulative_regret_after: 0.0,
                },
                TrialRecord {
                    trial_index: 1,
                    chosen_arm: 0,
                    outcome: 0,
                    instantaneous_regret: 0.0,
                    cumulative_regret_after: 0.0,
                },
            ],
            best_arm: 0,
            best_arm_policy: BestArmPolicy::LastSample,
            posterior_means: vec![0.5],
        };
        assert_eq!(result.cumulative_regret(), vec![0.0, 0.0, 0.0]);
        assert_eq!(result.num_trials(), 2);
    }
}
