//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events, background
//!   actions, or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod key_selector;
mod palette;
mod ui;

pub use key_selector::TuiKeySelector;

use log::{debug, error, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::keys::{KeySelector, check_key_status};
use crate::core::state::App;
use crate::core::storage::{API_KEY_KEY, FileStore, MemoryStore, PreferenceStore, storage_path};
use crate::core::theme::Shell;
use crate::inference::{GeminiFactory, Responder};
use crate::tui::component::EventHandler;
use crate::tui::components::{KeyPromptEvent, KeyPromptState, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::palette::Palette;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    /// Key-entry overlay (None = hidden)
    pub key_prompt: Option<KeyPromptState>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            key_prompt: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Opens the on-disk preference store, falling back to memory when it can't.
fn open_store() -> Arc<dyn PreferenceStore> {
    let Some(path) = storage_path() else {
        warn!("No home directory; preferences will not persist");
        return Arc::new(MemoryStore::default());
    };
    match FileStore::open(&path) {
        Ok(store) => {
            info!("Preferences loaded from {}", path.display());
            Arc::new(store)
        }
        Err(e) => {
            warn!("Failed to open {}: {}; preferences will not persist", path.display(), e);
            Arc::new(MemoryStore::default())
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let store = open_store();
    let mut shell = Shell::load(store.clone());

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let key_selector: Option<Arc<dyn KeySelector>> = if config.key_selector {
        Some(Arc::new(TuiKeySelector::new(
            store.clone(),
            config.api_key.is_some(),
            tx.clone(),
        )))
    } else {
        None
    };
    let factory = Arc::new(GeminiFactory::new(
        config.gemini_base_url.clone(),
        config.api_key.clone(),
        store.clone(),
    ));
    let responder = Arc::new(Responder::new(
        factory,
        key_selector.clone(),
        config.model_name.clone(),
        config.system_instruction.clone(),
    ));

    let mut app = App::new(config.model_name.clone(), key_selector.is_some());
    let mut tui = TuiState::new();

    spawn_key_check(key_selector, config.api_key.is_some(), tx.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Animation timer
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            let palette = Palette::for_theme(shell.theme());
            terminal.draw(|f| {
                ui::draw_ui(f, &app, &mut tui, palette, shell.is_dark(), spinner_frame)
            })?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = handle_event(event, &mut app, &mut tui, &mut shell, store.as_ref())
            else {
                continue;
            };
            let effect = update(&mut app, action);
            if apply_effect(effect, &mut tui, &responder, &tx) {
                break 'main;
            }
        }

        // Handle background task actions (replies, key status, picker requests)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if apply_effect(effect, &mut tui, &responder, &tx) {
                break 'main;
            }
        }
    }

    info!("CHINU shutting down");
    ratatui::restore();
    Ok(())
}

/// Routes one terminal event. Returns the core action it maps to, if any.
fn handle_event(
    event: TuiEvent,
    app: &mut App,
    tui: &mut TuiState,
    shell: &mut Shell,
    store: &dyn PreferenceStore,
) -> Option<Action> {
    // ForceQuit (Ctrl+C) always quits, even with the overlay open
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }
    // Resize just needs a redraw (already flagged by the caller)
    if matches!(event, TuiEvent::Resize) {
        return None;
    }

    // When the key overlay is open, route all events to it
    if let Some(prompt) = tui.key_prompt.as_mut() {
        return match prompt.handle_event(&event)? {
            KeyPromptEvent::Submit(key) => {
                tui.key_prompt = None;
                if let Err(e) = store.set(API_KEY_KEY, &key) {
                    // The key still works for this run: the store keeps it in memory
                    warn!("Failed to persist API key: {}", e);
                }
                info!("API key entered ({} chars)", key.len());
                Some(Action::KeySelected)
            }
            KeyPromptEvent::Dismiss => {
                tui.key_prompt = None;
                debug!("Key prompt dismissed");
                None
            }
        };
    }

    match event {
        TuiEvent::Escape => Some(Action::Quit),
        TuiEvent::Submit => Some(Action::Submit),
        TuiEvent::ClearChat => {
            tui.message_list = MessageListState::new();
            Some(Action::Clear)
        }
        TuiEvent::SelectKey => Some(Action::SelectKey),
        TuiEvent::ToggleTheme => {
            let theme = shell.toggle_theme();
            app.status_message = format!("Switched to {} mode", theme);
            None
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            None
        }
        other => other.as_edit().map(Action::Edit),
    }
}

/// Performs the I/O an effect asks for. Returns `true` when the loop should exit.
fn apply_effect(
    effect: Effect,
    tui: &mut TuiState,
    responder: &Arc<Responder>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::SpawnRequest { epoch, text } => {
            // New turn: follow it to the bottom
            tui.message_list.stick_to_bottom = true;
            spawn_request(responder.clone(), epoch, text, tx.clone());
            false
        }
        Effect::OpenKeySelector => {
            if tui.key_prompt.is_none() {
                tui.key_prompt = Some(KeyPromptState::new());
            }
            false
        }
        Effect::Quit => true,
    }
}

fn spawn_key_check(
    key_selector: Option<Arc<dyn KeySelector>>,
    env_key_present: bool,
    tx: mpsc::Sender<Action>,
) {
    tokio::spawn(async move {
        let selected = check_key_status(key_selector.as_deref(), env_key_present).await;
        if tx.send(Action::KeyStatus(selected)).is_err() {
            warn!("Failed to send key status: receiver dropped");
        }
    });
}

fn spawn_request(responder: Arc<Responder>, epoch: u64, text: String, tx: mpsc::Sender<Action>) {
    info!("Spawning reply request (epoch {})", epoch);

    let request = tokio::spawn(async move { responder.get_response(&text).await });

    // Forward the settled reply; a panicked or cancelled task becomes a failure
    tokio::spawn(async move {
        let action = match request.await {
            Ok(text) => Action::ResponseReceived { epoch, text },
            Err(e) => {
                error!("Reply task failed: {}", e);
                Action::ResponseFailed {
                    epoch,
                    error: e.to_string(),
                }
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to send reply: receiver dropped");
        }
    });
}
