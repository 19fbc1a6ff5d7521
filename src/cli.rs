use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::{Context, Result};

use crate::core::{Engine, RunResult};

/// Exit status when a check run recorded at least one changed fingerprint
pub const EXIT_CHANGED: u8 = 1;
/// Exit status for fatal configuration or store errors
pub const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "docwatch")]
#[command(about = "Catch changes in remote documentation pages")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load fingerprints and watched targets from --path and report changes
    Check {
        /// Path to the fingerprint store JSON, default '~/tmp/doc_scraper_hashes.json'
        #[arg(short, long, env = "DOCWATCH_PATH")]
        path: Option<String>,

        /// Telegram bot token and chat ID to notify; format: 'token,chatID'.
        /// Ex: '123456:ABC-DEF1234ghIkl-zyx57W2,-1234567890'
        #[arg(long, env = "DOCWATCH_TELEGRAM")]
        telegram: Option<String>,
    },

    /// Fetch every target and report its size without alerting
    Init {
        /// Path to the fingerprint store JSON, default '~/tmp/doc_scraper_hashes.json'
        #[arg(short, long, env = "DOCWATCH_PATH")]
        path: Option<String>,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<RunResult> {
        let result = match self.command {
            Commands::Check { path, telegram } => {
                engine.check(path, telegram).await.context("check run aborted")?
            }
            Commands::Init { path } => {
                engine.init(path).await.context("init run aborted")?
            }
        };
        Ok(result)
    }
}

/// Translate a completed run into the process exit status.
pub fn exit_status(result: &RunResult) -> u8 {
    if result.changed {
        EXIT_CHANGED
    } else {
        0
    }
}
