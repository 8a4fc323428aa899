//! Colors for the light and dark themes.
//!
//! The whole frame is painted from one `Palette`, so flipping the theme
//! restyles every component on the next draw.

use ratatui::style::{Color, Modifier, Style};

use crate::core::state::Sender;
use crate::core::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub accent: Color,
    pub user_bg: Color,
    pub user_fg: Color,
    pub bot_bg: Color,
    pub bot_fg: Color,
    pub input_bg: Color,
    pub disabled_bg: Color,
}

const LIGHT: Palette = Palette {
    background: Color::Rgb(255, 255, 255),
    text: Color::Rgb(31, 41, 55),
    muted: Color::Rgb(107, 114, 128),
    border: Color::Rgb(209, 213, 219),
    header_bg: Color::Rgb(37, 99, 235),
    header_fg: Color::Rgb(255, 255, 255),
    accent: Color::Rgb(37, 99, 235),
    user_bg: Color::Rgb(37, 99, 235),
    user_fg: Color::Rgb(255, 255, 255),
    bot_bg: Color::Rgb(229, 231, 235),
    bot_fg: Color::Rgb(31, 41, 55),
    input_bg: Color::Rgb(243, 244, 246),
    disabled_bg: Color::Rgb(229, 231, 235),
};

const DARK: Palette = Palette {
    background: Color::Rgb(17, 24, 39),
    text: Color::Rgb(243, 244, 246),
    muted: Color::Rgb(156, 163, 175),
    border: Color::Rgb(55, 65, 81),
    header_bg: Color::Rgb(30, 64, 175),
    header_fg: Color::Rgb(255, 255, 255),
    accent: Color::Rgb(147, 197, 253),
    user_bg: Color::Rgb(30, 64, 175),
    user_fg: Color::Rgb(255, 255, 255),
    bot_bg: Color::Rgb(55, 65, 81),
    bot_fg: Color::Rgb(243, 244, 246),
    input_bg: Color::Rgb(31, 41, 55),
    disabled_bg: Color::Rgb(55, 65, 81),
};

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn bubble(&self, sender: Sender) -> Style {
        match sender {
            Sender::User => Style::default().fg(self.user_fg).bg(self.user_bg),
            Sender::Bot => Style::default().fg(self.bot_fg).bg(self.bot_bg),
        }
    }
}
