use async_trait::async_trait;
use rand::Rng;
use reqwest::Url;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{Result, WatchError};

/// Retrieves the raw document behind a URL.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Return the response body, or `FetchFailed` on transport errors and
    /// non-success statuses.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Supplies the per-request token used to defeat intermediary caches.
pub trait TokenSource: Send + Sync {
    fn next_token(&self) -> String;
}

/// Random integer tokens in `[0, 1_000_000)`.
#[derive(Debug, Default)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn next_token(&self) -> String {
        rand::thread_rng().gen_range(0..1_000_000u32).to_string()
    }
}

/// reqwest-backed fetcher with a whole-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| WatchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let failed = |reason: String| WatchError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| failed(e.to_string()))
    }
}
