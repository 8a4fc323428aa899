//! # Loading Indicator
//!
//! A bot-side bubble with a spinner and "Thinking...", shown under the last
//! message while a request is outstanding.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::state::Sender;
use crate::tui::palette::Palette;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const LOADING_TEXT: &str = "Thinking...";

#[derive(Clone, Copy)]
pub struct LoadingIndicator {
    pub spinner_frame: usize,
    pub palette: Palette,
}

impl LoadingIndicator {
    /// Rows taken by the bubble (text line + borders).
    pub const HEIGHT: u16 = 3;
    /// Columns taken by the bubble.
    pub const WIDTH: u16 = 17;

    pub fn new(spinner_frame: usize, palette: Palette) -> Self {
        Self {
            spinner_frame,
            palette,
        }
    }
}

impl Widget for LoadingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = Self::WIDTH.min(area.width);
        let bubble = Rect::new(area.x, area.y, width, area.height.min(Self::HEIGHT));
        let style = self.palette.bubble(Sender::Bot);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style)
            .style(style)
            .padding(Padding::horizontal(1));
        let inner = block.inner(bubble);
        block.render(bubble, buf);

        let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
        let line = Line::from(vec![
            Span::styled(glyph, style.fg(self.palette.accent)),
            Span::raw(" "),
            Span::raw(LOADING_TEXT),
        ]);
        Paragraph::new(line).style(style).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::Theme;

    #[test]
    fn renders_spinner_and_text() {
        let area = Rect::new(0, 0, 30, LoadingIndicator::HEIGHT);
        let mut buf = Buffer::empty(area);
        LoadingIndicator::new(1, Palette::for_theme(Theme::Dark)).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Thinking..."));
        assert!(text.contains("⠙"));
    }

    #[test]
    fn spinner_frame_wraps_around() {
        let area = Rect::new(0, 0, 30, LoadingIndicator::HEIGHT);
        let mut buf = Buffer::empty(area);
        LoadingIndicator::new(SPINNER.len(), Palette::for_theme(Theme::Light)).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("⠋"));
    }
}
