//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::keys::KeySelector;
use crate::core::state::App;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError, ProviderFactory};

/// What a scripted provider does on its single call.
pub enum Outcome {
    Text(String),
    NoText,
    Error(ProviderError),
}

/// (model, message, system_instruction) as seen by a provider.
pub type SeenRequest = (String, String, String);

/// Hands out one `ScriptedProvider` per `create()`, each with the next outcome.
pub struct ScriptedFactory {
    outcomes: Mutex<VecDeque<Outcome>>,
    created: AtomicUsize,
    fail_create: bool,
    requests: Arc<Mutex<Vec<SeenRequest>>>,
}

impl ScriptedFactory {
    pub fn new(outcomes: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            created: AtomicUsize::new(0),
            fail_create: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// A factory whose `create()` always fails, like a missing API key.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(VecDeque::new()),
            created: AtomicUsize::new(0),
            fail_create: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ProviderFactory for ScriptedFactory {
    fn create(&self) -> Result<Box<dyn CompletionProvider>, ProviderError> {
        if self.fail_create {
            return Err(ProviderError::Config("no API key".to_string()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedFactory ran out of outcomes");
        Ok(Box::new(ScriptedProvider {
            outcome: Mutex::new(Some(outcome)),
            requests: self.requests.clone(),
        }))
    }
}

pub struct ScriptedProvider {
    outcome: Mutex<Option<Outcome>>,
    requests: Arc<Mutex<Vec<SeenRequest>>>,
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: CompletionRequest<'_>) -> Result<Option<String>, ProviderError> {
        self.requests.lock().unwrap().push((
            request.model.to_string(),
            request.message.to_string(),
            request.system_instruction.to_string(),
        ));
        match self.outcome.lock().unwrap().take() {
            Some(Outcome::Text(text)) => Ok(Some(text)),
            Some(Outcome::NoText) => Ok(None),
            Some(Outcome::Error(e)) => Err(e),
            None => panic!("ScriptedProvider called twice"),
        }
    }
}

/// Key selector that reports a fixed status and counts picker openings.
pub struct RecordingKeySelector {
    selected: bool,
    opens: AtomicUsize,
}

impl RecordingKeySelector {
    pub fn new(selected: bool) -> Self {
        Self {
            selected,
            opens: AtomicUsize::new(0),
        }
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySelector for RecordingKeySelector {
    async fn has_selected_key(&self) -> bool {
        self.selected
    }

    async fn open_key_selector(&self) {
        self.opens.fetch_add(1, Ordering::SeqCst);
    }
}

/// Creates a test App with key selection available and no key selected yet.
pub fn test_app() -> App {
    App::new("test-model".to_string(), true)
}
