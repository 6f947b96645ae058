use std::path::PathBuf;

use clap::Parser;

use spades_bench::config::{BenchmarkConfig, ResolvedOutputs};
use spades_bench::logging::init_logging;
use spades_bench::selfplay::SelfPlayRunner;
use spades_core::AppInfo;

/// Seeded self-play harness for the Spades rules engine.
#[derive(Debug, Parser)]
#[command(
    name = "spades-bench",
    author,
    version,
    about = "Deterministic Spades self-play harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/selfplay.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the master RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the per-game hand cap.
    #[arg(long, value_name = "HANDS")]
    max_hands: Option<u32>,

    /// Log every trick resolution to the telemetry file.
    #[arg(long)]
    trick_events: bool,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(max_hands) = cli.max_hands {
        config.games.max_hands = max_hands;
    }

    if cli.trick_events {
        config.logging.enable_structured = true;
        config.logging.trick_events = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let max_hands = config.games.max_hands;

    println!(
        "{} {}: loaded configuration '{run_id}' ({games} game{}, at most {max_hands} hands each)",
        AppInfo::name(),
        AppInfo::version(),
        if games == 1 { "" } else { "s" }
    );

    if cli.validate_only {
        println!("Validation-only mode: self-play skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SelfPlayRunner::new(config, outputs);
    let summary = runner.run()?;

    println!(
        "Self-play complete for '{run_id}': {} games ({} finished) → {} rows at {}",
        summary.games_played,
        summary.games_finished,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!(
        "Wins: North/South {}, East/West {}",
        summary.wins[0], summary.wins[1]
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
