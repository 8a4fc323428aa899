//! # Actions
//!
//! Everything that can happen in CHINU becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The model replies? That's `Action::ResponseReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller must
//! perform. No side effects here. I/O happens in the TUI loop.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::input::Edit;
use crate::core::state::{App, Message};

/// Shown when the request task fails without producing a reply.
pub const UNEXPECTED_ERROR: &str = "I'm sorry, an unexpected error occurred. Please try again.";

/// Shown when the user asks to pick a key but the environment can't.
pub const KEY_SELECTION_UNAVAILABLE: &str =
    "API key selection is not available. Set GEMINI_API_KEY and restart.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Edit the input buffer.
    Edit(Edit),
    /// Send the current input.
    Submit,
    /// The adapter settled with a reply for the conversation at `epoch`.
    ResponseReceived { epoch: u64, text: String },
    /// The request task failed before the adapter could reply.
    ResponseFailed { epoch: u64, error: String },
    /// Empty the conversation.
    Clear,
    /// Result of the mount-time key check.
    KeyStatus(bool),
    /// User asked to pick an API key.
    SelectKey,
    /// The adapter asked the environment to reopen the key picker.
    OpenKeySelector,
    /// A key was entered in the picker.
    KeySelected,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Call the Response Adapter with `text`; tag the reply with `epoch`.
    SpawnRequest { epoch: u64, text: String },
    OpenKeySelector,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Edit(edit) => {
            if app.input_enabled() {
                app.input.apply(edit);
            }
            Effect::None
        }
        Action::Submit => {
            if app.is_loading || app.input.is_blank() {
                debug!(
                    "Submit ignored (loading={}, blank={})",
                    app.is_loading,
                    app.input.is_blank()
                );
                return Effect::None;
            }
            let text = app.input.take().trim().to_string();
            app.messages.push(Message::user(text.clone()));
            app.is_loading = true;
            app.status_message = String::from("Thinking...");
            info!("Submitted turn ({} chars, epoch {})", text.len(), app.epoch);
            Effect::SpawnRequest {
                epoch: app.epoch,
                text,
            }
        }
        Action::ResponseReceived { epoch, text } => {
            if epoch != app.epoch {
                debug!("Dropping reply from cleared conversation (epoch {})", epoch);
                return Effect::None;
            }
            app.messages.push(Message::bot(text));
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }
        Action::ResponseFailed { epoch, error } => {
            if epoch != app.epoch {
                debug!("Dropping failure from cleared conversation (epoch {})", epoch);
                return Effect::None;
            }
            warn!("Request task failed: {}", error);
            app.messages.push(Message::bot_error(UNEXPECTED_ERROR));
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }
        Action::Clear => {
            app.messages.clear();
            app.is_loading = false;
            app.epoch += 1;
            app.status_message = String::from("Conversation cleared");
            Effect::None
        }
        Action::KeyStatus(selected) => {
            app.key_selected = selected;
            Effect::None
        }
        Action::SelectKey => {
            if app.key_selection_available {
                Effect::OpenKeySelector
            } else {
                app.status_message = KEY_SELECTION_UNAVAILABLE.to_string();
                Effect::None
            }
        }
        Action::OpenKeySelector => Effect::OpenKeySelector,
        Action::KeySelected => {
            // Optimistic: the picker doesn't confirm the key is valid.
            app.key_selected = true;
            app.status_message = String::from("API key selected");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
