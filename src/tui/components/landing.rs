//! # Landing Page Component
//!
//! Welcome panel shown while the conversation is empty and idle.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::palette::Palette;

pub const WELCOME_TITLE: &str = "Welcome to CHINU, your college assistant!";
pub const WELCOME_SUBTITLE: &str =
    "Ask me anything about Avanthees St Theressa Institute of Engineering and Technology.";
pub const CREDIT: &str = "Developed by: Sai (CSE AI and ML branch)";

pub struct LandingPage {
    palette: Palette,
}

impl LandingPage {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "( ... )",
                Style::default().fg(self.palette.accent),
            )),
            Line::default(),
            Line::from(Span::styled(
                WELCOME_TITLE,
                Style::default()
                    .fg(self.palette.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                WELCOME_SUBTITLE,
                Style::default().fg(self.palette.muted),
            )),
            Line::default(),
            Line::from(Span::styled(CREDIT, Style::default().fg(self.palette.muted))),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(self.palette.muted),
            )),
        ];

        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16 + 1)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered);
    }
}
