// In app/src/main.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use backtester::BatchBacktester;
use clap::{Parser, Subcommand};
use execution::remote::RemoteEngine;
use serde_json::Value;
use tracing_subscriber::prelude::*;

mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Runs a strategy configuration as a batch of calendar partitions.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a batch backtest against the configured compute engine.
    Batch {
        /// JSON file with overrides merged onto the base configuration.
        #[arg(short = 'f', long)]
        overrides: Option<PathBuf>,

        /// Writes the full outcome (reports and aggregates) as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Prints the partitions a batch would run, without running them.
    Spans {
        /// JSON file with overrides merged onto the base configuration.
        #[arg(short = 'f', long)]
        overrides: Option<PathBuf>,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("Failed to load application settings")?;

    let level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("reqwest", tracing::Level::WARN)
            .with_target("hyper", tracing::Level::WARN)
            .with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Starting batch runner");

    let base_config = app_config::load_base_config(&settings.batch.base_config)
        .with_context(|| format!("Failed to load base configuration '{}'", settings.batch.base_config))?;
    let api_client = api_client::new(&settings.engine)?;
    let backtester = BatchBacktester::new(Arc::new(RemoteEngine::new(api_client)), base_config);

    match cli.command {
        Commands::Batch { overrides, output } => {
            handle_batch(&backtester, overrides.as_deref(), output.as_deref()).await?;
        }
        Commands::Spans { overrides } => {
            handle_spans(&backtester, overrides.as_deref())?;
        }
    }

    tracing::info!("Batch runner has finished successfully.");

    Ok(())
}

/// Reads the overrides file, or an empty mapping when none was given.
fn load_overrides(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Default::default()));
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read overrides file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse overrides file {}", path.display()))
}

/// Handles the logic for the `batch` subcommand.
async fn handle_batch(backtester: &BatchBacktester, overrides: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let overrides = load_overrides(overrides)?;
    tracing::info!(engine = backtester.engine.name(), "Running batch backtest...");

    let outcome = backtester.run_batch(&overrides).await?;
    report::print_batch_report(&outcome);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Batch outcome written.");
    }

    Ok(())
}

/// Handles the logic for the `spans` subcommand.
fn handle_spans(backtester: &BatchBacktester, overrides: Option<&Path>) -> Result<()> {
    let overrides = load_overrides(overrides)?;
    let plan = backtester.plan(&overrides)?;
    report::print_plan(&plan);
    Ok(())
}
