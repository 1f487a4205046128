// =============================================================================
// Bandit Errors — every way a simulation run can abort
// =============================================================================
//
// All variants are fatal: a trial either completes fully (sample, select,
// observe, record) or the whole run aborts and the error reaches the caller.
// There is no retry path.
// =============================================================================

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, BanditError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BanditError {
    /// Arm count, trial count, or outcome-source settings are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An outcome source produced something other than 0 or 1.
    #[error("invalid outcome {value} for arm {arm} at trial {trial} (expected 0 or 1)")]
    InvalidOutcome {
        trial: usize,
        arm: usize,
        value: u8,
    },

    /// A replay matrix was asked for a trial it does not contain.
    #[error("trial {trial} is out of range (replay data has {available} trials)")]
    OutOfRangeTrial { trial: usize, available: usize },

    #[error("arm {arm} is out of range (engine has {num_arms} arms)")]
    ArmOutOfRange { arm: usize, num_arms: usize },

    /// Trials must run in strictly increasing order starting at 0.
    #[error("trial {got} executed out of order (expected trial {expected})")]
    TrialOutOfOrder { expected: usize, got: usize },

    /// Distribution construction failed (bad shape parameter or probability).
    #[error("sampling failed: {0}")]
    Sampling(String),

    /// A persisted sample matrix could not be parsed.
    #[error("malformed sample matrix at line {line}: {reason}")]
    MatrixFormat { line: usize, reason: String },
}
