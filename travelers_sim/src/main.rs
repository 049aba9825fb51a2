//! Travelers Simulator CLI
//!
//! Runs concurrent random walks on a toroidal grid and prints each
//! traveler's path as it completes.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use travelers_env::TokioContext;
use travelers_sim::{FaultSpec, Orchestrator, OutputFormat, ReportWriter, SimConfig};

/// Concurrent random walks on a torus
#[derive(Parser, Debug)]
#[command(name = "travelers-sim")]
#[command(about = "Run concurrent random walks on a toroidal grid", long_about = None)]
struct Args {
    /// Grid width in cells
    #[arg(short = 'W', long, default_value = "15")]
    width: u32,

    /// Grid height in cells
    #[arg(short = 'H', long, default_value = "15")]
    height: u32,

    /// Number of concurrent travelers
    #[arg(short = 'n', long, default_value = "15")]
    travelers: u32,

    /// Minimum steps per traveler (inclusive)
    #[arg(long, default_value = "10")]
    min_steps: usize,

    /// Maximum steps per traveler (exclusive)
    #[arg(long, default_value = "100")]
    max_steps: usize,

    /// Minimum delay per step in seconds (inclusive)
    #[arg(long, default_value = "0.01")]
    min_delay: f64,

    /// Maximum delay per step in seconds (exclusive)
    #[arg(long, default_value = "0.05")]
    max_delay: f64,

    /// Master seed for reproducible walks (default: OS entropy)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Make a traveler submit an illegal move, as ID or ID@STEP (repeatable)
    #[arg(long = "corrupt", value_name = "ID[@STEP]")]
    corrupt: Vec<FaultSpec>,

    /// Emit JSON lines instead of text records
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the records
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = SimConfig {
        width: args.width,
        height: args.height,
        traveler_count: args.travelers,
        min_steps: args.min_steps,
        max_steps: args.max_steps,
        min_delay_secs: args.min_delay,
        max_delay_secs: args.max_delay,
        seed: args.seed,
    };

    let context = Arc::new(match config.seed {
        Some(seed) => TokioContext::seeded(seed),
        None => TokioContext::new(),
    });
    let orchestrator = Orchestrator::new(&config, context)
        .context("Invalid configuration")?
        .with_faults(args.corrupt.into_iter().collect());

    let format = if args.json { OutputFormat::Json } else { OutputFormat::Text };
    let stdout = std::io::stdout();
    let mut writer = ReportWriter::new(stdout.lock(), format);
    writer.write_banner(orchestrator.plan())?;

    let mut write_error = None;
    let report = orchestrator
        .run_with(|outcome| {
            if write_error.is_none() {
                if let Err(e) = writer.write_outcome(outcome) {
                    write_error = Some(e);
                }
            }
        })
        .await;

    if let Some(e) = write_error {
        return Err(e).context("Failed to write traveler records");
    }
    writer.write_summary(&report)?;
    writer.flush()?;

    if report.failed() == 0 {
        info!(
            "✓ All {} travelers completed in {:.2}s",
            report.outcomes.len(),
            report.elapsed.as_secs_f64()
        );
    } else {
        warn!(
            "✗ {}/{} travelers failed",
            report.failed(),
            report.outcomes.len()
        );
    }

    Ok(())
}
