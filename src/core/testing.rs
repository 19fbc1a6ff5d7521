//! In-memory collaborators for exercising the detector and engine without a network.

use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::{ContentFetcher, Notifier, TokenSource};
use crate::error::{Result, WatchError};

/// Serves fixed documents keyed by address (the URL without its query).
#[derive(Default)]
pub struct StaticFetcher {
    pages: Mutex<HashMap<String, Option<String>>>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, address: &str, document: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(address.to_string(), Some(document.to_string()));
    }

    /// Make `address` fail as if the server returned an error status.
    pub fn fail(&self, address: &str) {
        self.pages.lock().unwrap().insert(address.to_string(), None);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());

        let mut address = url.clone();
        address.set_query(None);
        let page = self.pages.lock().unwrap().get(address.as_str()).cloned();

        match page {
            Some(Some(document)) => Ok(document),
            _ => Err(WatchError::FetchFailed {
                url: url.to_string(),
                reason: "HTTP 503 Service Unavailable".to_string(),
            }),
        }
    }
}

/// Records every message; optionally fails delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.failing {
            return Err(WatchError::Notify("channel down".to_string()));
        }
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}

/// Deterministic tokens: "1", "2", "3", ...
#[derive(Default)]
pub struct SequentialTokens {
    next: AtomicU64,
}

impl TokenSource for SequentialTokens {
    fn next_token(&self) -> String {
        (self.next.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}
