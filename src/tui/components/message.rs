use chrono::{DateTime, Local};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::core::state::{Message, Sender};
use crate::tui::palette::Palette;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// The timestamp sits on its own line under the text.
const TIMESTAMP_LINES: u16 = 1;
/// Bubbles never grow wider than this share of the message area.
const MAX_WIDTH_PERCENT: u16 = 70;
/// Narrow bubbles still get room for the title and timestamp.
const MIN_BUBBLE_WIDTH: u16 = 16;

/// Formats a message time like `3:04:05 PM`.
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%-I:%M:%S %p").to_string()
}

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::Bot => "CHINU",
    }
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// A stateless component that renders one chat message as a bubble.
///
/// User messages hug the right edge, bot messages the left. The bubble is
/// as wide as its longest line, capped at 70% of the row.
///
/// Text is wrapped with `textwrap` both when measuring and when drawing, so
/// [`calculate_height`](Self::calculate_height) always matches what is rendered.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    pub palette: Palette,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, palette: Palette) -> Self {
        Self { message, palette }
    }

    /// Width of the bubble (borders included) inside a row of `row_width` columns.
    pub fn bubble_width(message: &Message, row_width: u16) -> u16 {
        let share = (u32::from(row_width) * u32::from(MAX_WIDTH_PERCENT) / 100) as u16;
        let max_width = share.max(MIN_BUBBLE_WIDTH.min(row_width));

        let text_width = message
            .text
            .trim()
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0);
        let stamp_width = format_timestamp(&message.timestamp).width();
        let label_width = sender_label(message.sender).width() + 2;
        let needed = text_width.max(stamp_width).max(label_width) + HORIZONTAL_OVERHEAD as usize;

        (needed.min(max_width as usize)) as u16
    }

    /// Calculate the height required for this message in a row of `row_width` columns.
    pub fn calculate_height(message: &Message, row_width: u16) -> u16 {
        let width = Self::bubble_width(message, row_width);
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }
        let lines = Self::wrapped_lines(message, content_width).len();
        u16::try_from(lines.max(1))
            .unwrap_or(u16::MAX)
            .saturating_add(TIMESTAMP_LINES + VERTICAL_OVERHEAD)
    }

    fn wrapped_lines(message: &Message, content_width: u16) -> Vec<String> {
        textwrap::wrap(message.text.trim(), wrap_options(content_width))
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let width = Self::bubble_width(self.message, area.width).min(area.width);
        let x = match self.message.sender {
            Sender::User => area.x + area.width.saturating_sub(width),
            Sender::Bot => area.x,
        };
        let bubble = Rect::new(x, area.y, width, area.height);
        let style = self.palette.bubble(self.message.sender);
        let title_alignment = match self.message.sender {
            Sender::User => Alignment::Right,
            Sender::Bot => Alignment::Left,
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(sender_label(self.message.sender))
            .title_alignment(title_alignment)
            .border_style(style)
            .style(style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(bubble);
        block.render(bubble, buf);

        let mut lines: Vec<Line> = Self::wrapped_lines(self.message, inner.width)
            .into_iter()
            .map(Line::from)
            .collect();
        lines.push(
            Line::from(Span::styled(
                format_timestamp(&self.message.timestamp),
                style.add_modifier(Modifier::DIM),
            ))
            .right_aligned(),
        );

        Paragraph::new(lines).style(style).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::Theme;
    use chrono::TimeZone;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn message(sender: Sender, text: &str) -> Message {
        Message {
            id: "1".to_string(),
            text: text.to_string(),
            sender,
            timestamp: Local.with_ymd_and_hms(2026, 10, 18, 15, 4, 5).unwrap(),
        }
    }

    fn render_row(msg: &Message, width: u16) -> Vec<String> {
        let height = MessageBubble::calculate_height(msg, width);
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    MessageBubble::new(msg, Palette::for_theme(Theme::Light)),
                    f.area(),
                );
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn timestamp_is_twelve_hour_clock() {
        let msg = message(Sender::User, "hi");
        assert_eq!(format_timestamp(&msg.timestamp), "3:04:05 PM");
    }

    #[test]
    fn short_message_height_is_one_line_plus_stamp_and_borders() {
        let msg = message(Sender::Bot, "Hello");
        assert_eq!(
            MessageBubble::calculate_height(&msg, 80),
            1 + TIMESTAMP_LINES + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn long_message_caps_width_and_wraps() {
        let msg = message(Sender::Bot, &"word ".repeat(60));
        let width = MessageBubble::bubble_width(&msg, 100);
        assert_eq!(width, 70);
        assert!(MessageBubble::calculate_height(&msg, 100) > 1 + TIMESTAMP_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn zero_width_row_is_degenerate() {
        let msg = message(Sender::User, "Hello");
        assert_eq!(MessageBubble::calculate_height(&msg, 0), 1);
    }

    #[test]
    fn user_bubble_hugs_right_edge() {
        let msg = message(Sender::User, "Hi");
        let rows = render_row(&msg, 60);
        assert!(rows[0].starts_with(' '));
        assert!(rows[0].trim_end().ends_with('╮'));
        assert!(rows[1].contains("Hi"));
    }

    #[test]
    fn bot_bubble_hugs_left_edge_and_shows_time() {
        let msg = message(Sender::Bot, "Visit the admissions office.");
        let rows = render_row(&msg, 60);
        assert!(rows[0].starts_with('╭'));
        assert!(rows[0].contains("CHINU"));
        assert!(rows.iter().any(|r| r.contains("3:04:05 PM")));
    }
}
