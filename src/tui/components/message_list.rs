//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Lay out message bubbles top to bottom, one blank row apart
//! - Append the loading indicator while a request is outstanding
//! - Keep the view pinned to the bottom until the user scrolls up
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the messages (props).

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::loading::LoadingIndicator;
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

/// Blank rows between consecutive bubbles.
const MESSAGE_SPACING: u16 = 1;
/// The scroll canvas is addressed in `u16` rows.
const MAX_CANVAS_HEIGHT: u32 = u16::MAX as u32;
/// A single row may not crowd the loading indicator out of the canvas.
const MAX_ROW_HEIGHT: u16 = u16::MAX - LoadingIndicator::HEIGHT;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// Height of each message row (bubble + spacing), cached across frames
    pub heights: Vec<u16>,
    /// Row width the cached heights were measured at
    layout_width: u16,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Canvas height from the last render
    pub content_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            heights: Vec::new(),
            layout_width: 0,
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            content_height: 0,
        }
    }

    /// Measures rows not yet measured. Messages are append-only, so only a width
    /// change or a shorter conversation invalidates the cache.
    fn update_heights(&mut self, messages: &[Message], width: u16) {
        if self.layout_width != width || self.heights.len() > messages.len() {
            self.heights.clear();
            self.layout_width = width;
        }
        let measured = self.heights.len();
        self.heights.extend(messages[measured..].iter().map(|m| {
            MessageBubble::calculate_height(m, width)
                .saturating_add(MESSAGE_SPACING)
                .min(MAX_ROW_HEIGHT)
        }));
    }

    /// Index of the oldest message that still fits in the canvas, and the
    /// canvas height from there on (including `reserved` rows at the bottom).
    fn canvas_window(&self, reserved: u16) -> (usize, u16) {
        let mut first = self.heights.len();
        let mut total = u32::from(reserved);
        while first > 0 {
            let row = u32::from(self.heights[first - 1]);
            if total + row > MAX_CANVAS_HEIGHT {
                break;
            }
            total += row;
            first -= 1;
        }
        (first, total as u16)
    }

    fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view component.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub palette: Palette,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        is_loading: bool,
        spinner_frame: usize,
        palette: Palette,
    ) -> Self {
        Self {
            state,
            messages,
            is_loading,
            spinner_frame,
            palette,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Measure (cached), then keep the newest rows that fit the canvas
        self.state.update_heights(self.messages, content_width);
        let loading_height = if self.is_loading {
            LoadingIndicator::HEIGHT
        } else {
            0
        };
        let (first, canvas_height) = self.state.canvas_window(loading_height);
        self.state.content_height = canvas_height;
        self.state.viewport_height = area.height;

        // 2. Clamp scroll offset to prevent overscrolling past content
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }
        let scroll_offset = if self.state.stick_to_bottom {
            self.state.max_scroll()
        } else {
            self.state.scroll_state.offset().y
        };
        let visible = u32::from(scroll_offset)..u32::from(scroll_offset) + u32::from(area.height);

        // 3. Render only the rows that intersect the viewport
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height.max(1)))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u32 = 0;
        for (message, &row_height) in self.messages[first..]
            .iter()
            .zip(&self.state.heights[first..])
        {
            let row_end = y_offset + u32::from(row_height);
            if row_end > visible.start && y_offset < visible.end {
                let bubble_height = row_height.saturating_sub(MESSAGE_SPACING);
                let rect = Rect::new(0, y_offset as u16, content_width, bubble_height);
                scroll_view.render_widget(MessageBubble::new(message, self.palette), rect);
            }
            y_offset = row_end;
        }

        if self.is_loading {
            let rect = Rect::new(0, y_offset as u16, content_width, LoadingIndicator::HEIGHT);
            scroll_view.render_widget(
                LoadingIndicator::new(self.spinner_frame, self.palette),
                rect,
            );
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = (); // Scrolling is handled internally

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &mut MessageListState, messages: &[Message], is_loading: bool) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                MessageList::new(
                    state,
                    messages,
                    is_loading,
                    0,
                    Palette::for_theme(Theme::Light),
                )
                .render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn renders_messages_and_loading_indicator() {
        let mut state = MessageListState::new();
        let messages = vec![Message::user("What is the admission process?")];

        let text = draw(&mut state, &messages, true);

        assert!(text.contains("What is the admission process?"));
        assert!(text.contains("Thinking..."));
        assert_eq!(state.heights.len(), 1);
        assert_eq!(
            state.content_height,
            state.heights[0] + LoadingIndicator::HEIGHT
        );
    }

    #[test]
    fn no_loading_indicator_when_idle() {
        let mut state = MessageListState::new();
        let messages = vec![Message::user("Hi"), Message::bot("Hello!")];

        let text = draw(&mut state, &messages, false);

        assert!(text.contains("Hello!"));
        assert!(!text.contains("Thinking..."));
    }

    #[test]
    fn scroll_up_unpins_and_scroll_down_repins() {
        let mut state = MessageListState::new();
        let messages: Vec<Message> = (0..10).map(|i| Message::bot(format!("reply {i}"))).collect();
        draw(&mut state, &messages, false);
        assert!(state.content_height > state.viewport_height);

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);

        state.handle_event(&TuiEvent::ScrollPageDown);
        state.handle_event(&TuiEvent::ScrollPageDown);
        state.handle_event(&TuiEvent::ScrollPageDown);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn conversation_taller_than_canvas_keeps_newest_rows() {
        let mut state = MessageListState::new();
        let long_reply: String = (0..100).map(|i| format!("row {i}\n")).collect();
        let mut messages: Vec<Message> = (0..700)
            .map(|_| Message::bot(long_reply.clone()))
            .collect();
        messages.push(Message::bot("final reply"));

        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                MessageList::new(
                    &mut state,
                    &messages,
                    true,
                    0,
                    Palette::for_theme(Theme::Dark),
                )
                .render(f, f.area());
            })
            .unwrap();

        let total: u32 = state.heights.iter().map(|&h| u32::from(h)).sum();
        assert!(total > u32::from(u16::MAX));
        assert_eq!(state.heights.len(), messages.len());
        assert!(u32::from(state.content_height) <= MAX_CANVAS_HEIGHT);

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("final reply"));
        assert!(text.contains("Thinking..."));
    }

    #[test]
    fn heights_are_remeasured_after_resize() {
        let mut state = MessageListState::new();
        let messages = vec![Message::bot("word ".repeat(30))];

        state.update_heights(&messages, 100);
        let wide = state.heights[0];
        state.update_heights(&messages, 30);

        assert_eq!(state.heights.len(), 1);
        assert!(state.heights[0] > wide);
    }
}
