//! Modal overlay for entering a Gemini API key.
//!
//! Opened by the key selector. The typed key is masked; Enter hands it back to
//! the event loop for storage and Esc dismisses the overlay without changes.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::input::InputBuffer;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

pub const PROMPT_TITLE: &str = " Select API Key ";
pub const PROMPT_HINT: &str = "Paste your Gemini API key. Enter to save, Esc to cancel.";
const MASK: char = '•';

/// Overlay state. Lives in `TuiState` while the overlay is open.
#[derive(Debug, Default)]
pub struct KeyPromptState {
    buffer: InputBuffer,
}

impl KeyPromptState {
    pub fn new() -> Self {
        Self::default()
    }

    fn masked(&self) -> String {
        std::iter::repeat_n(MASK, self.buffer.text().chars().count()).collect()
    }
}

/// Events emitted by the key prompt.
#[derive(Debug, PartialEq)]
pub enum KeyPromptEvent {
    /// The user confirmed a (trimmed, non-empty) key.
    Submit(String),
    Dismiss,
}

impl EventHandler for KeyPromptState {
    type Event = KeyPromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(KeyPromptEvent::Dismiss),
            TuiEvent::Submit => {
                if self.buffer.is_blank() {
                    return None;
                }
                let key = self.buffer.take();
                Some(KeyPromptEvent::Submit(key.trim().to_string()))
            }
            other => {
                if let Some(edit) = other.as_edit() {
                    self.buffer.apply(edit);
                }
                None
            }
        }
    }
}

pub struct KeyPrompt<'a> {
    pub state: &'a KeyPromptState,
    pub palette: Palette,
}

impl<'a> KeyPrompt<'a> {
    pub fn new(state: &'a KeyPromptState, palette: Palette) -> Self {
        Self { state, palette }
    }
}

impl<'a> Component for KeyPrompt<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 7, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(PROMPT_TITLE)
            .border_style(Style::default().fg(self.palette.accent))
            .style(self.palette.base())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [hint_area, _, field_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let hint = Paragraph::new(Line::from(Span::styled(
            PROMPT_HINT,
            Style::default().fg(self.palette.muted),
        )))
        .wrap(Wrap { trim: true });
        frame.render_widget(hint, hint_area);

        let masked = self.state.masked();
        let field = Paragraph::new(Line::from(vec![
            Span::styled("Key: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(masked),
        ]))
        .style(Style::default().fg(self.palette.text).bg(self.palette.input_bg));
        frame.render_widget(field, field_area);

        let typed = self.state.buffer.text()[..self.state.buffer.cursor()]
            .chars()
            .count();
        let cursor_col = u16::try_from(typed).unwrap_or(u16::MAX);
        let cursor_x = field_area
            .x
            .saturating_add(5)
            .saturating_add(cursor_col)
            .min(field_area.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, field_area.y));
    }
}

/// Centered overlay of `percent_x` width and a fixed `height`.
fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [center_v] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(outer);
    let [center] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(state: &mut KeyPromptState, text: &str) {
        for c in text.chars() {
            assert_eq!(state.handle_event(&TuiEvent::InputChar(c)), None);
        }
    }

    #[test]
    fn submit_returns_trimmed_key() {
        let mut state = KeyPromptState::new();
        type_text(&mut state, " AIza-secret ");
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(KeyPromptEvent::Submit("AIza-secret".to_string()))
        );
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut state = KeyPromptState::new();
        type_text(&mut state, "   ");
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn escape_dismisses() {
        let mut state = KeyPromptState::new();
        assert_eq!(
            state.handle_event(&TuiEvent::Escape),
            Some(KeyPromptEvent::Dismiss)
        );
    }

    #[test]
    fn paste_and_backspace_edit_the_key() {
        let mut state = KeyPromptState::new();
        state.handle_event(&TuiEvent::Paste("abcd".to_string()));
        state.handle_event(&TuiEvent::Backspace);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(KeyPromptEvent::Submit("abc".to_string()))
        );
    }

    #[test]
    fn render_masks_key() {
        let mut state = KeyPromptState::new();
        type_text(&mut state, "secret");

        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| KeyPrompt::new(&state, Palette::for_theme(Theme::Dark)).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Select API Key"));
        assert!(text.contains("••••••"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn oversized_key_keeps_cursor_inside_field() {
        let mut state = KeyPromptState::new();
        state.handle_event(&TuiEvent::Paste("k".repeat(70_000)));

        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| KeyPrompt::new(&state, Palette::for_theme(Theme::Dark)).render(f, f.area()))
            .unwrap();

        let cursor = terminal.get_cursor_position().unwrap();
        assert!(cursor.x < 80);
        assert!(cursor.y < 20);
    }
}
