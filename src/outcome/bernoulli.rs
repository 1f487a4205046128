// =============================================================================
// Live Bernoulli Outcome Source — independent draws from true rates
// =============================================================================
//
// Stateless apart from its random stream: each call is a fresh Bernoulli
// draw with the arm's true rate and has no memory of earlier calls.
// =============================================================================

use crate::error::{BanditError, Result};
use crate::outcome::OutcomeSource;
use crate::random::RandomSource;

pub struct LiveBernoulli<R> {
    true_rates: Vec<f64>,
    random: R,
}

impl<R: RandomSource> LiveBernoulli<R> {
    pub fn new(true_rates: Vec<f64>, random: R) -> Result<Self> {
        validate_rates(&true_rates)?;
        Ok(Self { true_rates, random })
    }

    /// `num_arms` rates drawn uniformly from [0, 1).
    pub fn with_random_rates(num_arms: usize, mut random: R) -> Result<Self> {
        let rates = (0..num_arms).map(|_| random.uniform()).collect();
        Self::new(rates, random)
    }
}

impl<R: RandomSource> OutcomeSource for LiveBernoulli<R> {
    fn outcome(&mut self, _trial: usize, arm: usize) -> Result<u8> {
        let p = *self.true_rates.get(arm).ok_or(BanditError::ArmOutOfRange {
            arm,
            num_arms: self.true_rates.len(),
        })?;
        Ok(u8::from(self.random.bernoulli(p)?))
    }

    fn num_arms(&self) -> usize {
        self.true_rates.len()
    }

    fn true_rates(&self) -> Option<&[f64]> {
        Some(&self.true_rates)
    }
}

/// Non-empty, finite, each in [0, 1].
pub fn validate_rates(rates: &[f64]) -> Result<()> {
    if rates.is_empty() {
        return Err(BanditError::InvalidConfiguration(
            "true rate vector is empty".into(),
        ));
    }
    if let Some((i, p)) = rates
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0 || **p > 1.0)
    {
        return Err(BanditError::InvalidConfiguration(format!(
            "true rate for arm {i} is {p}, must be within [0, 1]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn certain_rates_give_certain_outcomes() {
        let mut src = LiveBernoulli::new(vec![1.0, 0.0], SeededRandom::from_seed(1)).unwrap();
        for t in 0..50 {
            assert_eq!(src.outcome(t, 0).unwrap(), 1);
            assert_eq!(src.outcome(t, 1).unwrap(), 0);
        }
    }

    #[test]
    fn empirical_rate_tracks_true_rate() {
        let mut src = LiveBernoulli::new(vec![0.3], SeededRandom::from_seed(5)).unwrap();
        let n = 20_000;
        let hits: u32 = (0..n).map(|t| u32::from(src.outcome(t, 0).unwrap())).sum();
        let rate = hits as f64 / n as f64;
        assert!((rate - 0.3).abs() < 0.02, "rate = {rate}");
    }

    #[test]
    fn rejects_bad_rates() {
        assert!(LiveBernoulli::new(vec![], SeededRandom::from_seed(0)).is_err());
        assert!(LiveBernoulli::new(vec![0.5, 1.2], SeededRandom::from_seed(0)).is_err());
        assert!(LiveBernoulli::new(vec![f64::NAN], SeededRandom::from_seed(0)).is_err());
    }

    #[test]
    fn random_rates_are_reported() {
        let src = LiveBernoulli::with_random_rates(5, SeededRandom::from_seed(2)).unwrap();
        let rates = src.true_rates().unwrap();
        assert_eq!(rates.len(), 5);
        assert!(rates.iter().all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    fn unknown_arm_is_out_of_range() {
        let mut src = LiveBernoulli::new(vec![0.5], SeededRandom::from_seed(0)).unwrap();
        assert!(matches!(
            src.outcome(0, 1),
            Err(BanditError::ArmOutOfRange {
                arm: 1,
                num_arms: 1,
            })
        ));
    }
}
