use std::fmt;

use async_trait::async_trait;

/// Errors that can occur during provider operations.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to answer one user turn.
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub message: &'a str,
    pub system_instruction: &'a str,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Generates a single reply. `Ok(None)` means the response carried no text.
    async fn generate(&self, request: CompletionRequest<'_>) -> Result<Option<String>, ProviderError>;
}

/// Builds a provider for exactly one call.
///
/// Implementations resolve credentials inside `create`, so a key picked
/// between two turns is used by the second one.
pub trait ProviderFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn CompletionProvider>, ProviderError>;
}
