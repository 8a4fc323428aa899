//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data, including the active `Palette`,
//! as parameters:
//! - `Header`: title bar with the clear / theme / API key actions
//! - `MessageBubble`: a single chat message
//! - `LoadingIndicator`: the "Thinking..." bubble
//! - `LandingPage`: welcome panel for an empty conversation
//! - `InputField`: draws the conversation's input buffer
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `MessageList`: scrollable conversation view with layout caching
//! - `KeyPrompt`: modal overlay for entering an API key
//!
//! Components receive external data as props, never by reaching into `App`,
//! which keeps them testable against a `TestBackend`.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── header.rs        (Top bar)
//! ├── message.rs       (Single message bubble)
//! ├── message_list.rs  (Scrollable message container)
//! ├── loading.rs       (Spinner bubble)
//! ├── landing.rs       (Welcome panel)
//! ├── input_field.rs   (Message input)
//! └── key_prompt.rs    (API key overlay)
//! ```

pub mod header;
pub mod input_field;
pub mod key_prompt;
pub mod landing;
pub mod loading;
pub mod message;
pub mod message_list;

pub use header::Header;
pub use input_field::InputField;
pub use key_prompt::{KeyPrompt, KeyPromptEvent, KeyPromptState};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
