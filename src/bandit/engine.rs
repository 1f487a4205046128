// =============================================================================
// Bandit Engine — Thompson Sampling over Beta-Bernoulli posteriors
// =============================================================================
//
// One trial:
//   1. sample_all   — draw theta_i ~ Beta(alpha_i, beta_i) for every arm, in
//                     ascending arm order from a single random stream.
//   2. select_arm   — argmax of the draws, lowest index wins ties.
//   3. outcome      — ask the OutcomeSource for the chosen arm's result.
//   4. observe      — bump successes or fails of the chosen arm.
//   5. regret       — max(theta) - theta[chosen], from the same draw as (2).
//
// Trials are strictly sequential: trial t selects from the posterior left by
// trial t-1, so the engine refuses to run them out of order.
// =============================================================================

use tracing::debug;

use crate::bandit::arm::{ArmState, PosteriorParameters};
use crate::bandit::regret::RegretTracker;
use crate::error::{BanditError, Result};
use crate::outcome::OutcomeSource;
use crate::random::RandomSource;
use crate::types::{BestArmPolicy, Outcome, TrialRecord};

pub struct BanditEngine<R> {
    arms: Vec<ArmState>,
    random: R,
    next_trial: usize,
}

impl<R: RandomSource> BanditEngine<R> {
    /// Fresh engine with `num_arms` arms at zero counts.
    pub fn new(num_arms: usize, random: R) -> Result<Self> {
        if num_arms < 1 {
            return Err(BanditError::InvalidConfiguration(
                "num_arms must be at least 1".into(),
            ));
        }
        Ok(Self {
            arms: vec![ArmState::new(); num_arms],
            random,
            next_trial: 0,
        })
    }

    pub fn num_arms(&self) -> usize {
        self.arms.len()
    }

    pub fn arms(&self) -> &[ArmState] {
        &self.arms
    }

    /// Trials completed so far.
    pub fn trials_run(&self) -> usize {
        self.next_trial
    }

    pub fn posterior(&self, arm: usize) -> Result<PosteriorParameters> {
        self.arms
            .get(arm)
            .map(ArmState::posterior)
            .ok_or(BanditError::ArmOutOfRange {
                arm,
                num_arms: self.arms.len(),
            })
    }

    pub fn posterior_means(&self) -> Vec<f64> {
        self.arms.iter().map(|a| a.posterior().mean()).collect()
    }

    pub fn successes(&self) -> Vec<u64> {
        self.arms.iter().map(|a| a.successes).collect()
    }

    pub fn fails(&self) -> Vec<u64> {
        self.arms.iter().map(|a| a.fails).collect()
    }

    /// One Beta draw per arm, ascending index. Leaves arm state untouched.
    pub fn sample_all(&mut self) -> Result<Vec<f64>> {
        let mut samples = Vec::with_capacity(self.arms.len());
        for arm in &self.arms {
            let p = arm.posterior();
            samples.push(self.random.beta(p.alpha, p.beta)?);
        }
        Ok(samples)
    }

    /// Index of the largest value. Exact ties go to the lowest index.
    pub fn select_arm(samples: &[f64]) -> usize {
        let mut best = 0;
        for (i, &v) in samples.iter().enumerate().skip(1) {
            if v > samples[best] {
                best = i;
            }
        }
        best
    }

    /// Fold one observed outcome into the chosen arm's counts.
    pub fn observe(&mut self, arm: usize, outcome: u8) -> Result<()> {
        let num_arms = self.arms.len();
        if arm >= num_arms {
            return Err(BanditError::ArmOutOfRange { arm, num_arms });
        }
        let outcome = Outcome::from_raw(outcome).ok_or(BanditError::InvalidOutcome {
            trial: self.next_trial,
            arm,
            value: outcome,
        })?;
        self.arms[arm].record(outcome);
        Ok(())
    }

    /// Run one complete trial. `trial_index` must equal the number of trials
    /// already run.
    pub fn run_trial<O>(
        &mut self,
        trial_index: usize,
        source: &mut O,
        regret: &mut RegretTracker,
    ) -> Result<TrialRecord>
    where
        O: OutcomeSource + ?Sized,
    {
        if trial_index != self.next_trial {
            return Err(BanditError::TrialOutOfOrder {
                expected: self.next_trial,
                got: trial_index,
            });
        }

        let samples = self.sample_all()?;
        let arm = Self::select_arm(&samples);
        let outcome = source.outcome(trial_index, arm)?;
        self.observe(arm, outcome)?;
        let (inst, cumulative) = regret.record(&samples, arm)?;
        self.next_trial += 1;

        debug!(
            trial = trial_index,
            arm,
            outcome,
            regret = inst,
            cumulative_regret = cumulative,
            "trial complete"
        );

        Ok(TrialRecord {
            trial_index,
            chosen_arm: arm,
            outcome,
            instantaneous_regret: inst,
            cumulative_regret_after: cumulative,
        })
    }

    /// Best arm by the final sampled vector.
    pub fn best_arm(samples: &[f64]) -> usize {
        Self::select_arm(samples)
    }

    /// Best arm by posterior mean, same tie rule.
    pub fn best_arm_by_mean(&self) -> usize {
        Self::select_arm(&self.posterior_means())
    }

    /// Final answer under `policy`. `LastSample` draws one more vector from
    /// the posteriors left by the last trial.
    pub fn choose_best(&mut self, policy: BestArmPolicy) -> Result<usize> {
        match policy {
            BestArmPolicy::LastSample => {
                let samples = self.sample_all()?;
                Ok(Self::best_arm(&samples))
            }
            BestArmPolicy::PosteriorMean => Ok(self.best_arm_by_mean()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
