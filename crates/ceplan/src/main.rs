mod config;
mod logging;
mod model;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::bail;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use ceplan_core::analysis::{ceac, ceac_summary, evpi, expected_loss};
use ceplan_core::evaluate::{run_owsa, run_psa, run_twsa};
use ceplan_core::model::sample_parameters;

use crate::config::AnalysisConfig;
use crate::model::{OUTCOME_COST, OUTCOME_QALY};

#[derive(Parser, Debug)]
#[command(name = "ceplan")]
#[command(about = "Sensitivity analysis runner for cost-effectiveness models")]
struct Args {
    /// Path to the analysis configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Directory for result artifacts
    #[arg(short, long, default_value = "ceplan-out")]
    out_dir: PathBuf,

    /// RNG seed for parameter sampling
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probabilistic sensitivity analysis over the configured distributions
    Psa {
        /// Number of parameter samples
        #[arg(short = 'n', long, default_value_t = 1000)]
        samples: usize,
    },
    /// One-way deterministic sweeps over the configured ranges
    Owsa {
        /// Evaluation points per parameter
        #[arg(long, default_value_t = 10)]
        nsamp: usize,
    },
    /// Two-way grid over the (exactly two) configured ranges
    Twsa {
        /// Evaluation points per parameter (nsamp^2 grid)
        #[arg(long, default_value_t = 10)]
        nsamp: usize,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init_logging(&args.log_level);

    let config = AnalysisConfig::load(&args.config)?;

    match &args.command {
        Command::Psa { samples } => run_psa_command(&args, &config, *samples),
        Command::Owsa { nsamp } => run_owsa_command(&args, &config, *nsamp),
        Command::Twsa { nsamp } => run_twsa_command(&args, &config, *nsamp),
    }?;

    tracing::info!("artifacts written to {}", args.out_dir.display());
    Ok(())
}

fn run_psa_command(args: &Args, config: &AnalysisConfig, samples: usize) -> color_eyre::Result<()> {
    if config.parameters.is_empty() {
        bail!("PSA requires at least one parameter distribution in the config");
    }
    let base = config.base_params(&model::base_case());

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let table = sample_parameters(&config.parameters, samples, &mut rng)?;
    tracing::info!(
        "sampled {} parameter(s) x {} sample(s)",
        table.n_parameters(),
        table.n_samples()
    );

    let psa = run_psa(&model::evaluate, &base, &table, None)?.into_psa(
        Some(OUTCOME_COST),
        OUTCOME_QALY,
        config.currency.as_str(),
        config.effect_unit.as_str(),
    )?;

    let wtps = config.wtp.thresholds();
    let ceac_rows = ceac(&psa, &wtps)?;

    report::write_json(&args.out_dir, "summary.json", &psa.summary())?;
    report::write_json(&args.out_dir, "icers.json", &psa.icers()?)?;
    report::write_json(&args.out_dir, "ceac.json", &ceac_rows)?;
    report::write_json(&args.out_dir, "ceac_summary.json", &ceac_summary(&ceac_rows))?;
    report::write_json(&args.out_dir, "expected_loss.json", &expected_loss(&psa, &wtps)?)?;
    report::write_json(&args.out_dir, "evpi.json", &evpi(&psa, &wtps)?)?;
    report::write_json(&args.out_dir, "parameters.json", psa.parameters())?;
    Ok(())
}

fn run_owsa_command(args: &Args, config: &AnalysisConfig, nsamp: usize) -> color_eyre::Result<()> {
    if config.ranges.is_empty() {
        bail!("one-way DSA requires at least one range in the config");
    }
    let base = config.base_params(&model::base_case());

    let tables = run_owsa(&model::evaluate, &base, &config.ranges, nsamp, None, None)?;
    tracing::info!(
        "swept {} parameter(s) at {} point(s) each",
        config.ranges.len(),
        nsamp
    );
    report::write_json(&args.out_dir, "owsa.json", &tables)?;
    Ok(())
}

fn run_twsa_command(args: &Args, config: &AnalysisConfig, nsamp: usize) -> color_eyre::Result<()> {
    let base = config.base_params(&model::base_case());

    let tables = run_twsa(&model::evaluate, &base, &config.ranges, nsamp, None, None)?;
    tracing::info!("evaluated {} grid point(s)", nsamp * nsamp);
    report::write_json(&args.out_dir, "twsa.json", &tables)?;
    Ok(())
}
