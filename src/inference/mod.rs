pub mod gemini;
pub mod provider;
pub mod responder;

pub use gemini::{GeminiFactory, GeminiProvider};
pub use provider::{CompletionProvider, CompletionRequest, ProviderError, ProviderFactory};
pub use responder::Responder;
