// =============================================================================
// bandit-sim — command line entry point
// =============================================================================
//
//   bandit-sim run      [--config PATH] [--arms N] [--trials N] [--seed N]
//                       [--rates a,b,..] [--matrix PATH] [--policy P] [--out PATH]
//   bandit-sim generate --rates a,b,.. [--trials N] [--seed N] --out PATH
//
// Precedence for `run`: defaults < config file < environment
// (BANDIT_ARMS, BANDIT_TRIALS, BANDIT_SEED, BANDIT_OUTPUT) < flags.
// =============================================================================

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thompson_bandit::matrix_io::write_matrix_csv;
use thompson_bandit::runtime_config::DEFAULT_NUM_TRIALS;
use thompson_bandit::synthetic::generate_matrix;
use thompson_bandit::{
    run_from_config, BestArmPolicy, OutcomeSourceConfig, SeededRandom, SimulationConfig,
};

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "bandit-sim")]
#[command(version, about = "Thompson Sampling A/B/n simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a simulation (default)
    Run(RunArgs),
    /// Write a synthetic trial x arm outcome matrix as CSV
    Generate(GenerateArgs),
}

#[derive(Debug, Default, Args)]
struct RunArgs {
    /// JSON simulation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of arms. Alone, it switches to randomly drawn true rates
    #[arg(long)]
    arms: Option<usize>,

    /// Number of trials
    #[arg(long)]
    trials: Option<usize>,

    /// Master seed. Unset means a non-reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Live Bernoulli true rates, comma separated
    #[arg(long, value_delimiter = ',', conflicts_with = "matrix")]
    rates: Option<Vec<f64>>,

    /// Replay a CSV outcome matrix (pandas layout, leading index column)
    #[arg(long)]
    matrix: Option<PathBuf>,

    /// Best-arm policy (last-sample, posterior-mean)
    #[arg(long)]
    policy: Option<BestArmPolicy>,

    /// Result export path (default: thompson_results_<timestamp>.json)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Per-arm success rates, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    rates: Vec<f64>,

    /// Number of rows (trials)
    #[arg(long, default_value_t = DEFAULT_NUM_TRIALS)]
    trials: usize,

    /// Seed for the generator
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long)]
    out: PathBuf,
}

// =============================================================================
// Environment overrides
// =============================================================================

/// `BANDIT_*` values, sitting between the config file and the flags.
#[derive(Debug, Default)]
struct EnvOverrides {
    arms: Option<usize>,
    trials: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        fn num<T>(key: &str, raw: Option<String>) -> Result<Option<T>>
        where
            T: std::str::FromStr,
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            raw.map(|v| v.trim().parse().with_context(|| format!("invalid {key}='{v}'")))
                .transpose()
        }

        Ok(Self {
            arms: num("BANDIT_ARMS", get("BANDIT_ARMS"))?,
            trials: num("BANDIT_TRIALS", get("BANDIT_TRIALS"))?,
            seed: num("BANDIT_SEED", get("BANDIT_SEED"))?,
            output: get("BANDIT_OUTPUT").map(PathBuf::from),
        })
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => run(&args, &EnvOverrides::from_env()?).map(|_| ()),
        Command::Generate(args) => generate(&args),
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Layer defaults, config file, environment and flags into one config.
fn build_config(args: &RunArgs, env: &EnvOverrides) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(arms) = env.arms {
        config.num_arms = Some(arms);
    }
    if let Some(trials) = env.trials {
        config.num_trials = trials;
    }
    if let Some(seed) = env.seed {
        config.random_seed = Some(seed);
    }
    if let Some(out) = &env.output {
        config.output_path = Some(out.clone());
    }

    if let Some(arms) = args.arms {
        config.num_arms = Some(arms);
    }
    if let Some(trials) = args.trials {
        config.num_trials = trials;
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(policy) = args.policy {
        config.best_arm_policy = policy;
    }
    if let Some(out) = &args.out {
        config.output_path = Some(out.clone());
    }
    match (&args.matrix, &args.rates) {
        (Some(_), Some(_)) => bail!("--matrix and --rates are mutually exclusive"),
        (Some(path), None) => {
            config.outcome_source = OutcomeSourceConfig::Replay {
                matrix_path: path.clone(),
                index_column: true,
            };
        }
        (None, Some(rates)) => {
            config.outcome_source = OutcomeSourceConfig::LiveBernoulli {
                true_rates: rates.clone(),
            };
        }
        (None, None) => {}
    }

    // An arm count with no explicit source means "random true rates".
    if config.num_arms.is_some()
        && args.rates.is_none()
        && args.matrix.is_none()
        && args.config.is_none()
    {
        config.outcome_source = OutcomeSourceConfig::RandomRates;
    }

    Ok(config)
}

/// Run one simulation and return where the export was written.
fn run(args: &RunArgs, env: &EnvOverrides) -> Result<PathBuf> {
    let config = build_config(args, env)?;
    if config.random_seed.is_none() {
        warn!("no random seed configured, results will not be reproducible");
    }

    let export = run_from_config(&config)?;

    let output = config.output_path.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "thompson_results_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });
    export.save(&output)?;

    info!(
        best_arm = export.best_arm,
        output = %output.display(),
        "run finished"
    );
    Ok(output)
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let mut random = SeededRandom::from_optional_seed(args.seed);
    let rows = generate_matrix(&args.rates, args.trials, &mut random)?;
    write_matrix_csv(&args.out, &rows)?;

    info!(
        output = %args.out.display(),
        trials = args.trials,
        arms = args.rates.len(),
        "sample matrix written"
    );
    Ok(())
}
