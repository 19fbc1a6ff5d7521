// src/core/engine.rs
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, WatchError};
use super::{
    ChangeDetector, ContentFetcher, FingerprintStore, HttpFetcher, Notifier, RandomTokens,
    RunMode, TargetStatus, TelegramNotifier, TelegramTarget, TokenSource,
};

/// A target that could not be processed this run.
#[derive(Debug)]
pub struct TargetError {
    pub key: String,
    pub error: WatchError,
}

/// Outcome of one invocation, translated into an exit status by the CLI.
#[derive(Debug)]
pub struct RunResult {
    pub mode: RunMode,
    /// Check mode only: at least one stored fingerprint differs from the loaded snapshot
    pub changed: bool,
    pub statuses: Vec<(String, TargetStatus)>,
    pub errors: Vec<TargetError>,
}

impl RunResult {
    pub fn change_events(&self) -> usize {
        self.statuses.iter().filter(|(_, s)| s.is_change_event()).count()
    }
}

/// Run controller: owns the load / detect / persist transaction.
pub struct Engine {
    config: Config,
    fetcher: Box<dyn ContentFetcher>,
    tokens: Box<dyn TokenSource>,
}

impl Engine {
    /// Create an engine with the HTTP fetcher and random cache-busting tokens
    pub async fn new(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::with_collaborators(config, Box::new(fetcher), Box::new(RandomTokens)))
    }

    pub fn with_collaborators(
        config: Config,
        fetcher: Box<dyn ContentFetcher>,
        tokens: Box<dyn TokenSource>,
    ) -> Self {
        Self { config, fetcher, tokens }
    }

    /// Detect changes, alerting through Telegram when a destination is configured.
    pub async fn check(&self, path: Option<String>, telegram: Option<String>) -> Result<RunResult> {
        // Notification config is validated before anything is read or fetched
        let spec = telegram.or_else(|| self.config.notify.telegram.clone()).unwrap_or_default();
        let notifier = match TelegramTarget::parse(&spec)? {
            Some(target) => {
                info!("📨 Telegram notifications enabled for chat {}", target.chat_id);
                Some(TelegramNotifier::new(target, &self.config.notify)?)
            }
            None => None,
        };

        let store_path = self.config.store_path(path.as_deref())?;
        self.run(&store_path, RunMode::Check, notifier.as_ref().map(|n| n as &dyn Notifier))
            .await
    }

    /// Baseline run: report extracted block sizes without alerting.
    pub async fn init(&self, path: Option<String>) -> Result<RunResult> {
        info!("Initializing fingerprints...");
        let store_path = self.config.store_path(path.as_deref())?;
        self.run(&store_path, RunMode::Init, None).await
    }

    /// Load the store, process every key present at load time, persist, diff.
    pub async fn run(
        &self,
        store_path: &Path,
        mode: RunMode,
        notifier: Option<&dyn Notifier>,
    ) -> Result<RunResult> {
        info!("🔍 Loading fingerprint store {}", store_path.display());
        let original = FingerprintStore::load(store_path)?;
        let mut working = original.clone();
        if original.is_empty() {
            warn!("⚠️ Fingerprint store {} has no targets", store_path.display());
        }

        let detector = ChangeDetector::new(
            self.fetcher.as_ref(),
            self.tokens.as_ref(),
            notifier,
            &self.config.fetch.cache_bust_param,
        );

        let mut statuses = Vec::with_capacity(original.len());
        let mut errors = Vec::new();

        for key in original.keys() {
            match detector.process(key, &mut working, mode).await {
                Ok(status) => statuses.push((key.to_string(), status)),
                Err(error) if error.is_target_scoped() => {
                    warn!("⚠️ {}. Skipping...", error);
                    errors.push(TargetError {
                        key: key.to_string(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        working.persist(store_path)?;

        let changed = mode == RunMode::Check && !working.changed_keys(&original).is_empty();

        let result = RunResult {
            mode,
            changed,
            statuses,
            errors,
        };

        info!(
            "✅ Processed {} targets: {} change events, {} errors",
            original.len(),
            result.change_events(),
            result.errors.len()
        );

        Ok(result)
    }
}
