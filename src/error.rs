use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docwatch operations
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot read fingerprint store {path}: {source}")]
    StoreUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fingerprint store {path} is not a JSON object of strings: {source}")]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist fingerprint store {path}: {reason}")]
    PersistFailed { path: PathBuf, reason: String },

    #[error("Key format is incorrect, expecting 'url\\n\\n###\\n\\nselector'. Got: {0:?}")]
    MalformedKey(String),

    #[error("Failed to fetch content from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Failed to extract content from {url}: {reason}")]
    ParseFailed { url: String, reason: String },

    #[error("Notification delivery failed: {0}")]
    Notify(String),
}

impl WatchError {
    /// Errors that only affect a single target and never abort the run.
    pub fn is_target_scoped(&self) -> bool {
        matches!(
            self,
            WatchError::MalformedKey(_) | WatchError::FetchFailed { .. } | WatchError::ParseFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;
