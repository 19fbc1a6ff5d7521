mod engine;
mod detector;
mod extract;
mod fetcher;
mod fingerprint;
mod notifier;
mod store;
mod target;

#[cfg(test)]
pub(crate) mod testing;

pub use store::FingerprintStore;
pub use fetcher::{ContentFetcher, HttpFetcher, RandomTokens, TokenSource};
pub use notifier::{Notifier, TelegramNotifier, TelegramTarget};
pub use detector::{ChangeDetector, RunMode, TargetStatus};

// Export the run controller
pub use engine::{Engine, RunResult};
