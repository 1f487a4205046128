// =============================================================================
// Thompson Bandit — Beta-Bernoulli Thompson Sampling simulator
// =============================================================================
//
// Picks, trial by trial, which of several variants to test next, learning
// each variant's success rate from observed 0/1 outcomes and tracking the
// regret paid for testing inferior variants along the way.
//
// Layering, leaf-first:
//   random      — injectable seeded randomness (Beta / Bernoulli / uniform)
//   outcome     — where trial results come from (replay matrix or live draws)
//   bandit      — arm posteriors, engine, regret tracker
//   simulation  — the fixed-length trial loop
//   recorder    — trial history and JSON result export
// =============================================================================

pub mod bandit;
pub mod error;
pub mod matrix_io;
pub mod outcome;
pub mod random;
pub mod recorder;
pub mod runtime_config;
pub mod simulation;
pub mod synthetic;
pub mod types;

pub use bandit::{ArmState, BanditEngine, PosteriorParameters, RegretTracker};
pub use error::{BanditError, Result};
pub use outcome::{LiveBernoulli, OutcomeSource, ReplaySource};
pub use random::{RandomSource, SeededRandom};
pub use recorder::{ResultExport, TrialRecorder};
pub use runtime_config::{OutcomeSourceConfig, SimulationConfig};
pub use simulation::{run_from_config, run_simulation};
pub use types::{BestArmPolicy, Outcome, SimulationResult, TrialRecord};
