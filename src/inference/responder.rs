//! # Response Adapter
//!
//! Turns one user message into one reply string. Every failure is mapped to
//! a fixed user-facing string, so callers never see an error:
//!
//! ```text
//! provider error "Requested entity was not found." + key selector → reopen picker, KEY_RESELECT_NOTICE
//! reply with no text                                              → NO_RESPONSE_NOTICE
//! anything else                                                   → GENERIC_APOLOGY (logged)
//! ```
//!
//! A provider is built per call through the factory. Nothing is cached, so a
//! key picked after a failure is used by the very next turn.

use std::sync::Arc;

use log::{error, info, warn};

use crate::core::keys::KeySelector;
use crate::inference::{CompletionRequest, ProviderError, ProviderFactory};

/// Provider error text that means the API key (or the project behind it) is not usable.
pub const KEY_NOT_FOUND_MARKER: &str = "Requested entity was not found.";

pub const KEY_RESELECT_NOTICE: &str = "There was an issue with the API key. Please select a valid key \
    from a paid GCP project. More details: ai.google.dev/gemini-api/docs/billing";

pub const NO_RESPONSE_NOTICE: &str = "I couldn't generate a response. Please try again.";

pub const GENERIC_APOLOGY: &str = "I apologize, but I encountered an error. Please try again later \
    or rephrase your question.";

pub struct Responder {
    factory: Arc<dyn ProviderFactory>,
    key_selector: Option<Arc<dyn KeySelector>>,
    model: String,
    system_instruction: String,
}

impl Responder {
    pub fn new(
        factory: Arc<dyn ProviderFactory>,
        key_selector: Option<Arc<dyn KeySelector>>,
        model: String,
        system_instruction: String,
    ) -> Self {
        Self {
            factory,
            key_selector,
            model,
            system_instruction,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Asks the model for a reply to `message` (already trimmed by the caller).
    pub async fn get_response(&self, message: &str) -> String {
        match self.try_generate(message).await {
            Ok(Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Model returned no text");
                NO_RESPONSE_NOTICE.to_string()
            }
            Err(e) => self.recover(e).await,
        }
    }

    async fn try_generate(&self, message: &str) -> Result<Option<String>, ProviderError> {
        let provider = self.factory.create()?;
        info!("Requesting reply from {} ({})", provider.name(), self.model);
        provider
            .generate(CompletionRequest {
                model: &self.model,
                message,
                system_instruction: &self.system_instruction,
            })
            .await
    }

    async fn recover(&self, err: ProviderError) -> String {
        if is_key_not_found(&err)
            && let Some(selector) = &self.key_selector
        {
            warn!("API key rejected ({}); reopening key selector", err);
            selector.open_key_selector().await;
            return KEY_RESELECT_NOTICE.to_string();
        }
        error!("Error communicating with Gemini API: {}", err);
        GENERIC_APOLOGY.to_string()
    }
}

fn is_key_not_found(err: &ProviderError) -> bool {
    err.to_string().contains(KEY_NOT_FOUND_MARKER)
}
