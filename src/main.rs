use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

use kautaliya::cli::Args;
use kautaliya::config::Config;
use kautaliya::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    init_logging(config.verbose)?;

    println!(
        "{}",
        format!("Kautaliya is listening on http://{}", config.bind_address()).green()
    );
    if config.verbose {
        eprintln!("{}", format!("[chat] Using model: {}", config.model).dimmed());
        eprintln!(
            "{}",
            format!("[chat] Request timeout: {}s", config.request_timeout).dimmed()
        );
        if let Some(max_pairs) = config.max_history_pairs {
            eprintln!(
                "{}",
                format!("[chat] Transcript capped at {} exchanges", max_pairs).dimmed()
            );
        }
    }

    server::serve(config).await
}

/// Respects RUST_LOG, otherwise info (debug with --verbose)
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
