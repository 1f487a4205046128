// =============================================================================
// Replay Outcome Source — precomputed trial x arm matrix
// =============================================================================

use crate::error::{BanditError, Result};
use crate::outcome::OutcomeSource;

/// Rows are trials, columns are arms. Every row has the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySource {
    rows: Vec<Vec<u8>>,
    num_arms: usize,
}

impl ReplaySource {
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self> {
        let num_arms = rows.first().map(Vec::len).unwrap_or(0);
        if num_arms == 0 {
            return Err(BanditError::InvalidConfiguration(
                "replay matrix has no arms".into(),
            ));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != num_arms) {
            return Err(BanditError::InvalidConfiguration(format!(
                "replay matrix row {i} has {} columns, expected {num_arms}",
                row.len()
            )));
        }
        Ok(Self { rows, num_arms })
    }

    pub fn num_trials(&self) -> usize {
        self.rows.len()
    }
}

impl OutcomeSource for ReplaySource {
    fn outcome(&mut self, trial: usize, arm: usize) -> Result<u8> {
        let row = self.rows.get(trial).ok_or(BanditError::OutOfRangeTrial {
            trial,
            available: self.rows.len(),
        })?;
        row.get(arm).copied().ok_or(BanditError::ArmOutOfRange {
            arm,
            num_arms: self.num_arms,
        })
    }

    fn num_arms(&self) -> usize {
        self.num_arms
    }
}
