//! # Application State
//!
//! Core conversation state for CHINU. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── messages: Vec<Message>          // conversation, insertion order
//! ├── input: InputBuffer              // what the user is typing
//! ├── is_loading: bool                // waiting for the model
//! ├── key_selected: bool              // API key available
//! ├── key_selection_available: bool   // environment can pick a key
//! ├── status_message: String          // footer text
//! ├── model_name: String              // current model
//! └── epoch: u64                      // bumped by clear
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use chrono::{DateTime, Local};

use crate::core::input::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped(text.into(), Sender::User, "")
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::stamped(text.into(), Sender::Bot, "-bot")
    }

    /// A bot message synthesized locally after the request task failed.
    pub fn bot_error(text: impl Into<String>) -> Self {
        Self::stamped(text.into(), Sender::Bot, "-error")
    }

    fn stamped(text: String, sender: Sender, id_suffix: &str) -> Self {
        let timestamp = Local::now();
        Self {
            id: format!("{}{}", timestamp.timestamp_millis(), id_suffix),
            text,
            sender,
            timestamp,
        }
    }
}

pub struct App {
    pub messages: Vec<Message>,
    pub input: InputBuffer,
    pub is_loading: bool,
    pub key_selected: bool,
    pub key_selection_available: bool,
    pub status_message: String,
    pub model_name: String,
    /// Conversation generation. Replies tagged with an older epoch are dropped.
    pub epoch: u64,
}

impl App {
    pub fn new(model_name: String, key_selection_available: bool) -> Self {
        Self {
            messages: Vec::new(),
            input: InputBuffer::new(),
            is_loading: false,
            key_selected: false,
            key_selection_available,
            status_message: String::from("Welcome to CHINU!"),
            model_name,
            epoch: 0,
        }
    }

    /// The input field accepts typing only while idle with a key selected.
    pub fn input_enabled(&self) -> bool {
        !self.is_loading && self.key_selected
    }
}
