//! # Core Application Logic
//!
//! This module contains CHINU's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (conversation) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Shell (theme)        │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │ Inference  │      │  Storage   │
//!     │  Adapter   │      │ (Gemini)   │      │  (JSON)    │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct: the conversation and its flags
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`input`]: Single-line input buffer with a cursor
//! - [`theme`]: Light/dark preference owned by the `Shell`
//! - [`storage`]: Local key-value store (the persisted preferences)
//! - [`keys`]: Optional API key selection capability
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod input;
pub mod keys;
pub mod state;
pub mod storage;
pub mod theme;
