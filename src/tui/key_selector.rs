//! Terminal implementation of `KeySelector`.
//!
//! The "picker" is the key-entry overlay. Opening it is a request posted to
//! the event loop; the entered key lands in the preference store, which is
//! where `GeminiFactory` looks first. A key from the environment or config
//! file also counts as selected.

use std::sync::{Arc, mpsc};

use async_trait::async_trait;
use log::warn;

use crate::core::action::Action;
use crate::core::keys::KeySelector;
use crate::core::storage::{API_KEY_KEY, PreferenceStore};

pub struct TuiKeySelector {
    store: Arc<dyn PreferenceStore>,
    configured_key: bool,
    tx: mpsc::Sender<Action>,
}

impl TuiKeySelector {
    pub fn new(store: Arc<dyn PreferenceStore>, configured_key: bool, tx: mpsc::Sender<Action>) -> Self {
        Self {
            store,
            configured_key,
            tx,
        }
    }
}

#[async_trait]
impl KeySelector for TuiKeySelector {
    async fn has_selected_key(&self) -> bool {
        self.configured_key
            || self
                .store
                .get(API_KEY_KEY)
                .is_some_and(|key| !key.trim().is_empty())
    }

    async fn open_key_selector(&self) {
        if self.tx.send(Action::OpenKeySelector).is_err() {
            warn!("Event loop gone; key selector not opened");
        }
    }
}
