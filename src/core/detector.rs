use tracing::{debug, info, warn};

use super::extract::{extract_block, newline_count};
use super::fingerprint::fingerprint;
use super::store::FingerprintStore;
use super::target::Target;
use super::{ContentFetcher, Notifier, TokenSource};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Compare, alert and record changes
    Check,
    /// Observe and report only
    Init,
}

/// What happened to a single target during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    /// Baseline mode: content extracted and measured, store untouched
    Baseline { newlines: usize },
    /// No prior fingerprint; recorded as a change event
    FirstObservation,
    Unchanged,
    Changed,
}

impl TargetStatus {
    pub fn is_change_event(&self) -> bool {
        matches!(self, TargetStatus::FirstObservation | TargetStatus::Changed)
    }
}

/// Per-target fetch, extract, fingerprint and compare.
pub struct ChangeDetector<'a> {
    fetcher: &'a dyn ContentFetcher,
    tokens: &'a dyn TokenSource,
    notifier: Option<&'a dyn Notifier>,
    cache_bust_param: &'a str,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(
        fetcher: &'a dyn ContentFetcher,
        tokens: &'a dyn TokenSource,
        notifier: Option<&'a dyn Notifier>,
        cache_bust_param: &'a str,
    ) -> Self {
        Self {
            fetcher,
            tokens,
            notifier,
            cache_bust_param,
        }
    }

    /// Process the target encoded in `key`, updating `working[key]` on a change event.
    ///
    /// Any error leaves `working` untouched. Notification failures are logged
    /// and do not prevent the fingerprint from being recorded.
    pub async fn process(
        &self,
        key: &str,
        working: &mut FingerprintStore,
        mode: RunMode,
    ) -> Result<TargetStatus> {
        let target = Target::resolve(key)?;
        let url = target.locator(self.cache_bust_param, &self.tokens.next_token())?;
        debug!("Fetching {}", url);

        let document = self.fetcher.fetch(&url).await?;
        let block = extract_block(&document, &target.extraction_rule, url.as_str())?;

        if mode == RunMode::Init {
            let newlines = newline_count(&block);
            info!("Number of newlines in content block for URL {}: {}", target.address, newlines);
            return Ok(TargetStatus::Baseline { newlines });
        }

        let new_fingerprint = fingerprint(&block);
        let old_fingerprint = working.get(key);
        let first_observation = old_fingerprint.is_empty();

        if !first_observation && old_fingerprint == new_fingerprint {
            debug!("Unchanged: {} ({})", target.address, new_fingerprint);
            return Ok(TargetStatus::Unchanged);
        }

        let message = format!("Content changed for URL: {}", target.address);
        info!("🔔 {}", message);

        if let Some(notifier) = self.notifier {
            if let Err(e) = notifier.notify(&message).await {
                warn!("⚠️ {} notification for {} not delivered: {}", notifier.channel_name(), target.address, e);
            }
        }

        working.set(key, new_fingerprint);

        Ok(if first_observation {
            TargetStatus::FirstObservation
        } else {
            TargetStatus::Changed
        })
    }
}
