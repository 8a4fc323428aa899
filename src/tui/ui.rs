use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Header, InputField, KeyPrompt, LandingPage, MessageList};
use crate::tui::palette::Palette;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

pub const FOOTER_HELP: &str = "Enter send · ↑↓ scroll · Esc quit";

pub fn draw_ui(
    frame: &mut Frame,
    app: &App,
    tui: &mut TuiState,
    palette: Palette,
    is_dark: bool,
    spinner_frame: usize,
) {
    use Constraint::{Length, Min};

    // Paint the whole frame so the theme covers cells no widget touches
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let layout = Layout::vertical([Length(1), Min(0), Length(InputField::HEIGHT), Length(1)]);
    let [header_area, main_area, input_area, footer_area] = layout.areas(frame.area());

    Header::new(app.key_selected, is_dark, palette).render(frame, header_area);

    if app.messages.is_empty() && !app.is_loading {
        LandingPage::new(palette).render(frame, main_area);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.messages,
            app.is_loading,
            spinner_frame,
            palette,
        )
        .render(frame, main_area);
    }

    // Cursor is only placed by the overlay while it is open
    let input_enabled = app.input_enabled() && tui.key_prompt.is_none();
    InputField::new(&app.input, input_enabled, app.key_selected, palette)
        .render(frame, input_area);

    draw_footer(frame, footer_area, app, palette);

    if let Some(prompt) = &tui.key_prompt {
        KeyPrompt::new(prompt, palette).render(frame, frame.area());
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App, palette: Palette) {
    let style = Style::default().fg(palette.muted).bg(palette.background);

    let help = Line::from(vec![
        Span::raw(FOOTER_HELP),
        Span::raw(" · "),
        Span::raw(app.model_name.as_str()),
        Span::raw(" "),
    ]);
    // Status keeps at least half the row
    let help_width = u16::try_from(help.width()).unwrap_or(u16::MAX).min(area.width / 2);
    let [status_area, help_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(help_width)]).areas(area);

    let status = Paragraph::new(Line::from(format!(" {}", app.status_message))).style(style);
    frame.render_widget(status, status_area);

    let help = Paragraph::new(help).style(style).alignment(Alignment::Right);
    frame.render_widget(help, help_area);
}
