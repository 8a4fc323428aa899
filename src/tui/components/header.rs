//! # Header Component
//!
//! Top bar with the assistant's name on the left and the three header
//! actions on the right: clear chat, theme switch, and API key status.
//!
//! Stateless: every field is a prop.
//!
//! ```text
//!  CHINU (College Assistant)          ^L Clear  ^T Dark mode  ^K Select API Key
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::palette::Palette;

pub const APP_TITLE: &str = "CHINU (College Assistant)";

pub struct Header {
    pub key_selected: bool,
    pub is_dark: bool,
    pub palette: Palette,
}

impl Header {
    pub fn new(key_selected: bool, is_dark: bool, palette: Palette) -> Self {
        Self {
            key_selected,
            is_dark,
            palette,
        }
    }

    fn theme_label(&self) -> &'static str {
        if self.is_dark { "Light mode" } else { "Dark mode" }
    }

    fn key_label(&self) -> &'static str {
        if self.key_selected {
            "API Key Selected"
        } else {
            "Select API Key"
        }
    }
}

impl Component for Header {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = self.palette.header();

        let title = Paragraph::new(Line::from(format!(" {APP_TITLE}"))).style(style);
        frame.render_widget(title, area);

        let hint = |keys: &'static str, label: &'static str| {
            [
                Span::raw(keys),
                Span::raw(" "),
                Span::raw(label),
                Span::raw("  "),
            ]
        };
        let spans: Vec<Span> = hint("^L", "Clear")
            .into_iter()
            .chain(hint("^T", self.theme_label()))
            .chain(hint("^K", self.key_label()))
            .collect();
        let actions = Paragraph::new(Line::from(spans))
            .style(style)
            .alignment(Alignment::Right);
        frame.render_widget(actions, area);
    }
}
