//! # API Key Selection
//!
//! The hosting environment may offer a way to pick an API key. When it does,
//! CHINU asks it whether a key is already selected (once, at startup) and
//! asks it to reopen the picker when the provider rejects the current key.
//! When it doesn't, a configured key (env var or config file) is the only source.

use async_trait::async_trait;
use log::info;

#[async_trait]
pub trait KeySelector: Send + Sync {
    /// Whether a key has already been picked.
    async fn has_selected_key(&self) -> bool;

    /// Asks the environment to show its key picker.
    async fn open_key_selector(&self);
}

/// Mount-time key check: the selector's answer when one exists,
/// otherwise whether a key came from the environment or config file.
pub async fn check_key_status(selector: Option<&dyn KeySelector>, env_key_present: bool) -> bool {
    let selected = match selector {
        Some(selector) => selector.has_selected_key().await,
        None => env_key_present,
    };
    info!(
        "API key status at startup: selected={} (selector available: {})",
        selected,
        selector.is_some()
    );
    selected
}
