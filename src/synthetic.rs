// =============================================================================
// Synthetic Sample Generation — trial x arm outcome matrices from target rates
// =============================================================================
//
// Each cell is an independent Bernoulli(p_arm) draw, so a column's empirical
// mean converges on its target rate as the trial count grows. At small trial
// counts it is only a Monte Carlo approximation.
// =============================================================================

use tracing::info;

use crate::error::{BanditError, Result};
use crate::outcome::bernoulli::validate_rates;
use crate::random::RandomSource;
use crate::types::Outcome;

/// Rows are trials, columns follow the order of `rates`. Cells are drawn
/// row by row, arm by arm.
pub fn generate_matrix<R: RandomSource>(
    rates: &[f64],
    num_trials: usize,
    random: &mut R,
) -> Result<Vec<Vec<u8>>> {
    validate_rates(rates)?;
    if num_trials < 1 {
        return Err(BanditError::InvalidConfiguration(
            "num_trials must be at least 1".into(),
        ));
    }

    let mut rows = Vec::with_capacity(num_trials);
    for _ in 0..num_trials {
        let mut row = Vec::with_capacity(rates.len());
        for &p in rates {
            row.push(Outcome::from(random.bernoulli(p)?).as_raw());
        }
        rows.push(row);
    }

    info!(
        arms = rates.len(),
        trials = num_trials,
        empirical = ?column_means(&rows),
        "synthetic sample matrix generated"
    );
    Ok(rows)
}

/// Fraction of 1-cells per column.
pub fn column_means(rows: &[Vec<u8>]) -> Vec<f64> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if rows.is_empty() {
        return vec![0.0; width];
    }
    let mut sums = vec![0u64; width];
    for row in rows {
        for (s, &c) in sums.iter_mut().zip(row) {
            *s += u64::from(c);
        }
    }
    sums.into_iter()
        .map(|s| s as f64 / rows.len() as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn shape_matches_request() {
        let mut r = SeededRandom::from_seed(1);
        let m = generate_matrix(&[0.22, 0.24, 0.23, 0.21], 50, &mut r).unwrap();
        assert_eq!(m.len(), 50);
        assert!(m.iter().all(|row| row.len() == 4));
        assert!(m.iter().flatten().all(|&c| c <= 1));
    }

    #[test]
    fn large_sample_hits_target_rate() {
        let mut r = SeededRandom::from_seed(2024);
        let m = generate_matrix(&[0.25], 100_000, &mut r).unwrap();
        let mean = column_means(&m)[0];
        assert!((mean - 0.25).abs() <= 0.01, "mean = {mean}");
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_matrix(&[0.5, 0.1], 200, &mut SeededRandom::from_seed(8)).unwrap();
        let b = generate_matrix(&[0.5, 0.1], 200, &mut SeededRandom::from_seed(8)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_zero_trials_and_bad_rates() {
        let mut r = SeededRandom::from_seed(0);
        assert!(generate_matrix(&[0.5], 0, &mut r).is_err());
        assert!(generate_matrix(&[-0.1], 10, &mut r).is_err());
        assert!(generate_matrix(&[], 10, &mut r).is_err());
    }

    #[test]
    fn column_means_of_fixed_matrix() {
        let m = vec![vec![1, 0], vec![1, 1], vec![0, 0], vec![1, 0]];
        assert_eq!(column_means(&m), vec![0.75, 0.25]);
    }
}
