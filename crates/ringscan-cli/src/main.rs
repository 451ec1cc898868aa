//! RingScan CLI.
//!
//! Ingests a transaction CSV, runs the detection pipeline, and writes
//! the analysis report as JSON.

mod ingest;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ringscan::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ringscan")]
#[command(version, about = "Fraud-ring detection over transaction batches", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a transaction CSV and emit a JSON report
    Analyze {
        /// Input CSV (transaction_id,sender_id,receiver_id,amount,timestamp)
        file: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,

        /// Input size cap in MiB
        #[arg(long, default_value_t = 10)]
        max_size_mib: u64,

        /// Engine configuration JSON (defaults apply where omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the pipeline stages
    Stages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            output,
            pretty,
            max_size_mib,
            config,
        } => cmd_analyze(file, output, pretty, max_size_mib, config).await,
        Commands::Stages => cmd_stages(),
    }
}

async fn cmd_analyze(
    file: PathBuf,
    output: Option<PathBuf>,
    pretty: bool,
    max_size_mib: u64,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<EngineConfig>(&contents)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let records = ingest::load_records(&file, max_size_mib * 1024 * 1024)
        .with_context(|| format!("ingesting {}", file.display()))?;

    let engine = AnalysisEngine::with_config(config)?;
    let report = engine.analyze(records).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    tracing::info!(
        accounts = report.summary.total_accounts_analyzed,
        flagged = report.summary.suspicious_accounts_flagged,
        rings = report.summary.fraud_rings_detected,
        seconds = report.summary.processing_time_seconds,
        "analysis finished"
    );
    Ok(())
}

fn cmd_stages() -> anyhow::Result<()> {
    println!("RingScan pipeline stages:\n");
    for stage in ringscan::catalog::stages() {
        let mode = if stage.concurrent {
            "concurrent"
        } else {
            "sequential"
        };
        println!("  {:<28} [{mode}] {}", stage.id, stage.description);
    }
    Ok(())
}
