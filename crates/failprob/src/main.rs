use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use failprob::{ExperimentConfig, init_logging, run_experiment};

#[derive(Parser, Debug)]
#[command(name = "failprob")]
#[command(about = "Estimate probabilities of failure for random loss functions")]
struct Args {
    /// Path to the experiment YAML file
    config: PathBuf,

    /// Override the seed from the experiment file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to failprob.log in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let _guard = init_logging(&args.log_level, args.log_dir.as_deref())?;

    let config = ExperimentConfig::load(&args.config)?;

    let seed = args.seed.unwrap_or(config.seed);
    let report = run_experiment(&config, seed).wrap_err("experiment setup failed")?;

    print!("{report}");
    Ok(())
}
