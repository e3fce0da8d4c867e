//! Truth Engine driver
//!
//! Reads an `AnalysisInput` JSON file, runs the full pipeline and prints the
//! report as JSON.
//!
//! ```text
//! truth_engine <input.json> [--config engine.yaml] [--compact]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use truth_engine::{AnalysisInput, ConfigLoader, Orchestrator};

/// Contradiction, behavior and liability analysis over attributed statements.
#[derive(Parser, Debug)]
#[command(name = "truth_engine", version)]
struct Args {
    /// `AnalysisInput` JSON file (actors and raw statements).
    input: PathBuf,

    /// Engine config (.json, .yaml or .yml). Defaults apply when absent.
    #[arg(short, long, env = "TRUTH_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Print single-line JSON instead of pretty output.
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging on stderr so stdout stays pure JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::new(path).load()?,
        None => Default::default(),
    };

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input {:?}", args.input))?;
    let input = AnalysisInput::from_json(&content).context("Failed to parse analysis input")?;

    let mut engine = Orchestrator::new(config).context("Invalid engine configuration")?;
    let report = engine.run(input).context("Analysis failed")?;

    info!(
        "Analysis complete: {} statements, {} contradictions, {} patterns",
        report.summary.statement_count, report.summary.contradiction_count, report.summary.pattern_count
    );

    let json = if args.compact { report.to_json()? } else { report.to_json_pretty()? };
    println!("{}", json);
    Ok(())
}
