//! ragbench CLI - RAG service benchmarking
//!
//! This binary serves the benchmark API or runs a single benchmark from a file.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ragbench::{read_test_cases, write_results};
use ragbench_core::config::Config;
use ragbench_server::BenchmarkService;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ragbench")]
#[command(about = "Benchmark a RAG service with LLM-judged metrics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the benchmark REST API
    Serve,
    /// Run one benchmark from a JSON file of test cases
    Run {
        /// JSON array of {"user_input", "reference"} objects
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Write results here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Serve => serve(cli.config.as_deref()).await,
        Commands::Run { input, output } => {
            run(cli.config.as_deref(), &input, output.as_deref()).await
        }
    }
}

/// Initialize logging system. `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ragbench={level},ragbench_core={level},ragbench_storage={level},\
             ragbench_embeddings={level},ragbench_rag_client={level},\
             ragbench_evaluation={level},ragbench_server={level},tower_http={level}"
        ))
    });

    // Logs go to stderr so `run` output on stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Start the REST server
async fn serve(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    info!("Benchmarking RAG service at {}", config.rag_service.url());

    ragbench_server::run_server(config)
        .await
        .context("Server failed")
}

/// Run a benchmark without the HTTP layer
async fn run(config_path: Option<&Path>, input: &Path, output: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let tests = read_test_cases(input)?;
    info!("Loaded {} test cases from {}", tests.len(), input.display());

    let service = BenchmarkService::from_config(&config)
        .await
        .context("Failed to initialize benchmark service")?;
    let results = service
        .run_benchmark(&tests)
        .await
        .context("Benchmark failed")?;

    write_results(&results, output)?;
    if let Some(path) = output {
        info!("Wrote {} results to {}", results.len(), path.display());
    }
    Ok(())
}
