use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod config;
mod error;

use cli::Cli;
use crate::core::{Engine, RunMode, TargetStatus};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; RUST_LOG overrides the default level
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting docwatch v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(cli::EXIT_FATAL)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let engine = Engine::new(cli.config.as_deref()).await?;
    let result = cli.execute(engine).await?;

    for (key, status) in &result.statuses {
        match status {
            TargetStatus::Baseline { newlines } => debug!("{:?}: baseline, {} newlines", key, newlines),
            other => debug!("{:?}: {:?}", key, other),
        }
    }
    if !result.errors.is_empty() {
        warn!("{} targets not processed this run", result.errors.len());
        for failure in &result.errors {
            debug!("{:?}: {}", failure.key, failure.error);
        }
    }
    if result.mode == RunMode::Check && result.changed {
        info!("Changes detected");
    }

    Ok(cli::exit_status(&result))
}
