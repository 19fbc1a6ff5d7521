use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, WatchError};

pub const DEFAULT_STORE_PATH: &str = "~/tmp/doc_scraper_hashes.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fingerprint store location
    pub store: StoreConfig,

    /// HTTP retrieval settings
    pub fetch: FetchConfig,

    /// Notification channel settings
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the JSON fingerprint store; a leading `~` is expanded
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Query parameter carrying the cache-busting token
    pub cache_bust_param: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Telegram destination as `token,chatID`
    pub telegram: Option<String>,

    /// Telegram Bot API base URL
    pub api_base: String,

    /// Timeout for a single delivery, in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("docwatch/{}", env!("CARGO_PKG_VERSION")),
            cache_bust_param: "nocache".to_string(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            telegram: None,
            api_base: "https://api.telegram.org".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            WatchError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| WatchError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            // An explicitly named config file must exist
            Some(p) => Self::load(p),
            None => {
                let candidates = ["docwatch.toml", ".docwatch.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    /// Resolve the store path, preferring an explicit override.
    pub fn store_path(&self, overridden: Option<&str>) -> Result<PathBuf> {
        expand_home(overridden.unwrap_or(&self.store.path))
    }
}

/// Replace a leading `~` with the invoking user's home directory.
pub fn expand_home(raw: &str) -> Result<PathBuf> {
    match raw.strip_prefix('~') {
        Some(rest) => {
            let home = home_dir().ok_or_else(|| {
                WatchError::Config("cannot determine the user's home directory".to_string())
            })?;
            let mut expanded = home.into_os_string();
            expanded.push(rest);
            Ok(PathBuf::from(expanded))
        }
        None => Ok(PathBuf::from(raw)),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
