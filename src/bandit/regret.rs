// =============================================================================
// Regret Tracker — per-trial and cumulative opportunity cost
// =============================================================================
//
//   instantaneous_t = max(samples_t) - samples_t[chosen_t]
//   cumulative_t    = cumulative_{t-1} + instantaneous_t,  cumulative_0 = 0
//
// Regret must be computed from the same sample vector that drove selection in
// that trial. With the chosen arm being the argmax of that vector the
// instantaneous value is >= 0 and the running total never decreases.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{BanditError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegretTracker {
    cumulative: f64,
    instantaneous: Vec<f64>,
}

impl RegretTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gap between the best sample and the chosen arm's sample.
    pub fn instantaneous_regret(samples: &[f64], chosen_arm: usize) -> Result<f64> {
        let chosen = *samples.get(chosen_arm).ok_or(BanditError::ArmOutOfRange {
            arm: chosen_arm,
            num_arms: samples.len(),
        })?;
        let best = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(best - chosen)
    }

    pub fn accumulate(previous_cumulative: f64, instantaneous: f64) -> f64 {
        previous_cumulative + instantaneous
    }

    /// Record one trial. Returns `(instantaneous, cumulative_after)`.
    pub fn record(&mut self, samples: &[f64], chosen_arm: usize) -> Result<(f64, f64)> {
        let inst = Self::instantaneous_regret(samples, chosen_arm)?;
        self.cumulative = Self::accumulate(self.cumulative, inst);
        self.instantaneous.push(inst);
        Ok((inst, self.cumulative))
    }

    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }

    /// Running totals with a leading 0 (length = trials + 1).
    pub fn cumulative_history(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.instantaneous.len() + 1);
        let mut running = 0.0;
        out.push(running);
        for &r in &self.instantaneous {
            running = Self::accumulate(running, r);
            out.push(running);
        }
        out
    }
}
