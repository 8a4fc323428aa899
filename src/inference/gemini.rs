//! Google Gemini provider using the `generateContent` endpoint.
//!
//! One non-streaming request per turn:
//!
//! ```text
//! POST {base_url}/models/{model}:generateContent
//! x-goog-api-key: <key>
//! { "contents": [...], "systemInstruction": { "parts": [...] } }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::storage::{API_KEY_KEY, PreferenceStore};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, ProviderFactory};

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Set on reasoning parts from thinking models; those aren't part of the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            thought: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// The request body for `generateContent`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Error envelope: `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

// ============================================================================
// Translation Layer
// ============================================================================

fn build_request(request: &CompletionRequest<'_>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(request.message)],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part::text(request.system_instruction)],
        },
    }
}

/// Concatenates the answer parts of the first candidate. Empty → `None`.
fn response_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter(|part| part.thought != Some(true))
        .filter_map(|part| part.text.as_deref())
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

/// Extracts `error.message` from an error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: CompletionRequest<'_>) -> Result<Option<String>, ProviderError> {
        let body = build_request(&request);
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        info!(
            "Gemini generateContent request: model={}, message_len={}",
            request.model,
            request.message.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error: {} - {}", status.as_u16(), err_body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_message(&err_body),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let text = response_text(&parsed);
        debug!(
            "Gemini reply: {} candidates, {} text bytes",
            parsed.candidates.len(),
            text.as_ref().map_or(0, String::len)
        );
        Ok(text)
    }
}

/// Creates a `GeminiProvider` per call with the freshest key.
///
/// Key precedence: the key stored by the in-app picker, then the configured
/// key (env var or config file).
pub struct GeminiFactory {
    base_url: String,
    configured_key: Option<String>,
    store: Arc<dyn PreferenceStore>,
}

impl GeminiFactory {
    pub fn new(
        base_url: String,
        configured_key: Option<String>,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            base_url,
            configured_key,
            store,
        }
    }

    fn current_key(&self) -> Option<String> {
        self.store
            .get(API_KEY_KEY)
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.configured_key.clone())
    }
}

impl ProviderFactory for GeminiFactory {
    fn create(&self) -> Result<Box<dyn CompletionProvider>, ProviderError> {
        let api_key = self.current_key().ok_or_else(|| {
            ProviderError::Config(
                "no API key (select one with Ctrl+K or set GEMINI_API_KEY)".to_string(),
            )
        })?;
        Ok(Box::new(GeminiProvider::new(api_key, self.base_url.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;

    #[test]
    fn request_uses_camel_case_system_instruction() {
        let request = CompletionRequest {
            model: "gemini-2.5-flash",
            message: "Hello",
            system_instruction: "Be brief.",
        };
        let json = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert!(json["systemInstruction"].get("role").is_none());
        assert!(json.get("system_instruction").is_none());
    }

    #[test]
    fn response_text_joins_parts_and_skips_thoughts() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "planning...", "thought": true},
                        {"text": "Visit the "},
                        {"text": "admissions office."}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response_text(&parsed).as_deref(),
            Some("Visit the admissions office.")
        );
    }

    #[test]
    fn response_text_none_without_candidates() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(response_text(&parsed), None);
    }

    #[test]
    fn response_text_none_without_content() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert_eq!(response_text(&parsed), None);
    }

    #[test]
    fn error_message_prefers_envelope() {
        let body = r#"{"error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}}"#;
        assert_eq!(error_message(body), "Requested entity was not found.");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn factory_without_any_key_is_config_error() {
        let factory = GeminiFactory::new(
            "http://localhost".to_string(),
            None,
            Arc::new(MemoryStore::default()),
        );
        assert!(matches!(factory.create(), Err(ProviderError::Config(_))));
    }

    #[test]
    fn stored_key_wins_over_configured_key() {
        let store = Arc::new(MemoryStore::default());
        let factory = GeminiFactory::new(
            "http://localhost".to_string(),
            Some("from-env".to_string()),
            store.clone(),
        );
        assert_eq!(factory.current_key().as_deref(), Some("from-env"));

        store.set(API_KEY_KEY, "picked").unwrap();
        assert_eq!(factory.current_key().as_deref(), Some("picked"));
    }
}
