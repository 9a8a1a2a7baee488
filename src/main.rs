use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use opinio::{Config, Engine, analysis::Analyzer};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Run,

    Batch {
        #[arg(long)]
        runs: u64,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    log::info!("{cfg:#?}");

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed = {seed}");

    match args.command {
        Command::Run => run_simulation(cfg, seed)?,
        Command::Batch { runs } => run_batch(cfg, seed, runs)?,
    }

    Ok(())
}

fn run_simulation(cfg: Config, seed: u64) -> Result<()> {
    let max_interactions = cfg.max_interactions;

    let mut engine = Engine::from_seed(seed);
    engine.on_progress_update(move |stats| {
        let progress = 100.0 * stats.interaction_index as f64 / max_interactions as f64;
        log::info!("completed {progress:06.2}%");
    });
    engine
        .initialize(cfg)
        .context("failed to initialize engine")?;

    let stats = engine
        .run_to_completion()
        .context("failed to run simulation")?;

    let output = serde_json::to_string_pretty(&stats).context("failed to serialize stats")?;
    println!("{output}");

    Ok(())
}

fn run_batch(cfg: Config, seed: u64, runs: u64) -> Result<()> {
    let mut analyzer = Analyzer::new(cfg);
    for i_run in 0..runs {
        let run_seed = seed.wrapping_add(i_run);
        analyzer
            .add_run(run_seed)
            .with_context(|| format!("failed to perform run {i_run}"))?;

        let progress = 100.0 * (i_run + 1) as f64 / runs as f64;
        log::info!("completed {progress:06.2}%");
    }

    let output =
        serde_json::to_string_pretty(&analyzer.report()).context("failed to serialize report")?;
    println!("{output}");

    Ok(())
}
