// =============================================================================
// Outcome Sources
// =============================================================================
//
// Where trial results come from. One trait, two strategies:
// - Replay: a precomputed trial x arm matrix of 0/1 cells.
// - LiveBernoulli: fresh independent draws from known true per-arm rates.
//
// Sources return the raw cell value; the engine rejects anything outside
// {0, 1} rather than coercing it.

pub mod bernoulli;
pub mod replay;

pub use bernoulli::LiveBernoulli;
pub use replay::ReplaySource;

use crate::error::Result;

pub trait OutcomeSource {
    /// Result of testing `arm` in trial `trial` (1 = success, 0 = failure).
    fn outcome(&mut self, trial: usize, arm: usize) -> Result<u8>;

    /// Number of arms this source can answer for.
    fn num_arms(&self) -> usize;

    /// Known true success rates, if the source has them.
    fn true_rates(&self) -> Option<&[f64]> {
        None
    }
}

impl<O: OutcomeSource + ?Sized> OutcomeSource for Box<O> {
    fn outcome(&mut self, trial: usize, arm: usize) -> Result<u8> {
        (**self).outcome(trial, arm)
    }

    fn num_arms(&self) -> usize {
        (**self).num_arms()
    }

    fn true_rates(&self) -> Option<&[f64]> {
        (**self).true_rates()
    }
}
