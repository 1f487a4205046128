// =============================================================================
// Bandit Module — Thompson Sampling core
// =============================================================================
//
// - ArmState / PosteriorParameters: per-arm counts and their Beta posterior.
// - BanditEngine: sample, select, observe, one trial at a time.
// - RegretTracker: per-trial and cumulative regret from the sampled vector.

pub mod arm;
pub mod engine;
pub mod regret;

pub use arm::{ArmState, PosteriorParameters};
pub use engine::BanditEngine;
pub use regret::RegretTracker;
