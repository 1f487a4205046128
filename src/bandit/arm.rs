// =============================================================================
// Arm State — per-variant Beta-Bernoulli posterior
// =============================================================================
//
// Each arm keeps only its observed counts. The Beta posterior is derived on
// demand with a Beta(1, 1) uniform prior:
//
//   alpha = successes + 1
//   beta  = fails + 1
//
// so both shapes are >= 1 for the lifetime of the arm and the sampler never
// sees a degenerate parameter.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::Outcome;

/// Shape parameters of an arm's Beta posterior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosteriorParameters {
    pub alpha: f64,
    pub beta: f64,
}

impl PosteriorParameters {
    /// Posterior mean `alpha / (alpha + beta)`.
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }
}

/// Observed counts for one arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmState {
    pub successes: u64,
    pub fails: u64,
}

impl ArmState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.successes += 1,
            Outcome::Failure => self.fails += 1,
        }
    }

    /// Number of trials in which this arm was chosen.
    pub fn pulls(&self) -> u64 {
        self.successes + self.fails
    }

    pub fn posterior(&self) -> PosteriorParameters {
        PosteriorParameters {
            alpha: self.successes as f64 + 1.0,
            beta: self.fails as f64 + 1.0,
        }
    }
}
