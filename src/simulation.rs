// =============================================================================
// Simulation Driver — the fixed-length trial loop
// =============================================================================
//
// A run owns a fresh engine, regret tracker and recorder. Trials execute
// strictly in order 0..num_trials; any error aborts the whole run, there is
// no partial result. After the last trial the best arm is chosen under the
// configured policy and everything is handed back to the caller. Nothing
// survives between runs.
//
// Seeding: one master stream is built from the configured seed and forked
// into an engine stream and an outcome stream, so live Bernoulli draws never
// shift the engine's posterior samples.
// =============================================================================

use anyhow::Context;
use tracing::{debug, info};

use crate::bandit::{BanditEngine, RegretTracker};
use crate::error::{BanditError, Result};
use crate::matrix_io::read_matrix_csv;
use crate::outcome::{LiveBernoulli, OutcomeSource, ReplaySource};
use crate::random::{RandomSource, SeededRandom};
use crate::recorder::{ResultExport, TrialRecorder};
use crate::runtime_config::{OutcomeSourceConfig, SimulationConfig};
use crate::types::{BestArmPolicy, SimulationResult};

/// Run `num_trials` Thompson trials against `source`.
pub fn run_simulation<R, O>(
    num_arms: usize,
    num_trials: usize,
    random: R,
    source: &mut O,
    policy: BestArmPolicy,
) -> Result<SimulationResult>
where
    R: RandomSource,
    O: OutcomeSource + ?Sized,
{
    if num_trials < 1 {
        return Err(BanditError::InvalidConfiguration(
            "num_trials must be at least 1".into(),
        ));
    }
    if source.num_arms() != num_arms {
        return Err(BanditError::InvalidConfiguration(format!(
            "engine has {num_arms} arms but the outcome source provides {}",
            source.num_arms()
        )));
    }

    let mut engine = BanditEngine::new(num_arms, random)?;
    let mut regret = RegretTracker::new();
    let mut recorder = TrialRecorder::with_capacity(num_trials);

    for trial in 0..num_trials {
        let record = engine.run_trial(trial, source, &mut regret)?;
        recorder.push(record)?;
    }
    debug!(
        recorded = recorder.len(),
        engine_trials = engine.trials_run(),
        cumulative_regret = regret.cumulative(),
        "trial loop finished"
    );

    let best_arm = engine.choose_best(policy)?;

    Ok(SimulationResult {
        successes: engine.successes(),
        fails: engine.fails(),
        posterior_means: engine.posterior_means(),
        trials: recorder.into_records(),
        best_arm,
        best_arm_policy: policy,
    })
}

/// Build the outcome source described by `config`.
pub fn build_outcome_source(
    config: &SimulationConfig,
    random: SeededRandom,
) -> anyhow::Result<Box<dyn OutcomeSource>> {
    let source: Box<dyn OutcomeSource> = match &config.outcome_source {
        OutcomeSourceConfig::Replay {
            matrix_path,
            index_column,
        } => {
            let rows = read_matrix_csv(matrix_path, *index_column)?;
            let replay = ReplaySource::new(rows)?;
            debug!(
                path = %matrix_path.display(),
                trials = replay.num_trials(),
                arms = replay.num_arms(),
                "replay matrix loaded"
            );
            Box::new(replay)
        }
        OutcomeSourceConfig::LiveBernoulli { true_rates } => {
            Box::new(LiveBernoulli::new(true_rates.clone(), random)?)
        }
        OutcomeSourceConfig::RandomRates => {
            let arms = config.resolve_num_arms(None)?;
            Box::new(LiveBernoulli::with_random_rates(arms, random)?)
        }
    };
    Ok(source)
}

/// Validate `config`, run it end to end and produce the export.
pub fn run_from_config(config: &SimulationConfig) -> anyhow::Result<ResultExport> {
    config.validate().context("invalid simulation config")?;

    let mut master = SeededRandom::from_optional_seed(config.random_seed);
    let engine_random = master.fork();
    let outcome_random = master.fork();

    let mut source = build_outcome_source(config, outcome_random)?;
    let num_arms = config
        .resolve_num_arms(Some(source.num_arms()))
        .context("invalid simulation config")?;

    info!(
        arms = num_arms,
        trials = config.num_trials,
        seed = ?config.random_seed,
        policy = %config.best_arm_policy,
        true_rates = ?source.true_rates(),
        "simulation starting"
    );

    let result = run_simulation(
        num_arms,
        config.num_trials,
        engine_random,
        &mut source,
        config.best_arm_policy,
    )
    .context("simulation aborted")?;

    log_summary(&result);
    Ok(ResultExport::from_result(&result, source.true_rates()))
}

fn log_summary(result: &SimulationResult) {
    let win_sum: u64 = result.successes.iter().sum();
    let loss_sum: u64 = result.fails.iter().sum();
    let cumulative = result
        .trials
        .last()
        .map(|t| t.cumulative_regret_after)
        .unwrap_or(0.0);
    info!(
        wins = ?result.successes,
        win_sum,
        losses = ?result.fails,
        loss_sum,
        cumulative_regret = cumulative,
        best_arm = result.best_arm,
        "simulation complete"
    );
}

// =============================================================================
// Tests
// =============================================================================
