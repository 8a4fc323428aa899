//! # InputField Component
//!
//! Renders the single-line message field from the conversation's `InputBuffer`.
//!
//! The buffer itself is owned by `App`; edits reach it as `Action::Edit`, so this
//! component only draws. When the text is wider than the field, the view scrolls
//! horizontally to keep the cursor visible.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::input::InputBuffer;
use crate::tui::component::Component;
use crate::tui::palette::Palette;

pub const PLACEHOLDER: &str = "Type your message...";
pub const PLACEHOLDER_NO_KEY: &str = "Please select your API Key first...";

/// Border (1) + padding (1) on the left side.
const TEXT_INSET: u16 = 2;

pub struct InputField<'a> {
    pub buffer: &'a InputBuffer,
    pub enabled: bool,
    pub key_selected: bool,
    pub palette: Palette,
}

impl<'a> InputField<'a> {
    /// Rows taken by the field (text line + borders).
    pub const HEIGHT: u16 = 3;

    pub fn new(buffer: &'a InputBuffer, enabled: bool, key_selected: bool, palette: Palette) -> Self {
        Self {
            buffer,
            enabled,
            key_selected,
            palette,
        }
    }

    fn placeholder(&self) -> &'static str {
        if self.key_selected {
            PLACEHOLDER
        } else {
            PLACEHOLDER_NO_KEY
        }
    }

    /// Returns the visible slice of the buffer and the cursor column inside it.
    fn visible_window(&self, width: u16) -> (&'a str, u16) {
        let text = self.buffer.text();
        let width = usize::from(width);
        if width == 0 {
            return ("", 0);
        }

        let before_cursor = &text[..self.buffer.cursor()];
        let cursor_col = before_cursor.width();

        // Drop chars from the front until the cursor fits, leaving one column for it
        let mut start = 0;
        let mut skipped = 0;
        for (idx, c) in before_cursor.char_indices() {
            if cursor_col - skipped < width {
                break;
            }
            skipped += c.width().unwrap_or(0);
            start = idx + c.len_utf8();
        }

        let mut end = start;
        let mut used = 0;
        for (idx, c) in text[start..].char_indices() {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            end = start + idx + c.len_utf8();
        }

        (&text[start..end], (cursor_col - skipped) as u16)
    }
}

impl<'a> Component for InputField<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = if self.enabled {
            Style::default().fg(self.palette.text).bg(self.palette.input_bg)
        } else {
            Style::default()
                .fg(self.palette.muted)
                .bg(self.palette.disabled_bg)
        };
        let border_style = if self.enabled {
            Style::default().fg(self.palette.accent)
        } else {
            Style::default().fg(self.palette.border)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(style)
            .padding(ratatui::widgets::Padding::horizontal(1));
        let inner = block.inner(area);

        let (visible, cursor_col) = self.visible_window(inner.width);
        let line = if self.buffer.text().is_empty() {
            Line::from(Span::styled(
                self.placeholder(),
                Style::default()
                    .fg(self.palette.muted)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Line::from(visible)
        };

        frame.render_widget(Paragraph::new(line).block(block), area);

        if self.enabled && inner.width > 0 {
            frame.set_cursor_position((area.x + TEXT_INSET + cursor_col, area.y + 1));
        }
    }
}
