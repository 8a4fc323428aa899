//! # Input Buffer
//!
//! The single-line text field the user types into. The buffer lives in the
//! conversation state (`App`), so clearing it on submit is part of the
//! reducer rather than a side effect of the widget.
//!
//! The cursor is a byte offset that always sits on a char boundary.

/// A single editing operation on the input buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Insert(char),
    /// Bracketed paste. Newlines are flattened to spaces (single-line field).
    Paste(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position as a byte offset into `text()`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Empties the buffer and returns what it held.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Applies an edit. Returns `true` if the buffer or cursor changed.
    pub fn apply(&mut self, edit: Edit) -> bool {
        match edit {
            Edit::Insert(c) => {
                let c = if c == '\n' || c == '\r' { ' ' } else { c };
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            Edit::Paste(pasted) => {
                let flattened: String = pasted
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                if flattened.is_empty() {
                    return false;
                }
                self.text.insert_str(self.cursor, &flattened);
                self.cursor += flattened.len();
                true
            }
            Edit::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let prev = prev_char_boundary(&self.text, self.cursor);
                self.text.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            Edit::Delete => {
                if self.cursor >= self.text.len() {
                    return false;
                }
                let next = next_char_boundary(&self.text, self.cursor);
                self.text.drain(self.cursor..next);
                true
            }
            Edit::Left => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor = prev_char_boundary(&self.text, self.cursor);
                true
            }
            Edit::Right => {
                if self.cursor >= self.text.len() {
                    return false;
                }
                self.cursor = next_char_boundary(&self.text, self.cursor);
                true
            }
            Edit::Home => (self.cursor != 0).then(|| self.cursor = 0).is_some(),
            Edit::End => {
                let end = self.text.len();
                (self.cursor != end).then(|| self.cursor = end).is_some()
            }
        }
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputBuffer {
        let mut buf = InputBuffer::new();
        for c in s.chars() {
            buf.apply(Edit::Insert(c));
        }
        buf
    }

    #[test]
    fn insert_and_backspace() {
        let mut buf = typed("ab");
        assert_eq!(buf.text(), "ab");
        assert_eq!(buf.cursor(), 2);

        assert!(buf.apply(Edit::Backspace));
        assert_eq!(buf.text(), "a");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut buf = InputBuffer::new();
        assert!(!buf.apply(Edit::Backspace));
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn insert_in_middle_after_cursor_moves() {
        let mut buf = typed("ac");
        buf.apply(Edit::Left);
        buf.apply(Edit::Insert('b'));
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn multibyte_chars_keep_cursor_on_boundaries() {
        let mut buf = typed("héllo");
        buf.apply(Edit::Home);
        buf.apply(Edit::Right);
        buf.apply(Edit::Right);
        assert_eq!(buf.cursor(), 3); // 'h' (1 byte) + 'é' (2 bytes)
        buf.apply(Edit::Backspace);
        assert_eq!(buf.text(), "hllo");
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut buf = typed("abc");
        buf.apply(Edit::Home);
        assert!(buf.apply(Edit::Delete));
        assert_eq!(buf.text(), "bc");
        buf.apply(Edit::End);
        assert!(!buf.apply(Edit::Delete));
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut buf = InputBuffer::new();
        buf.apply(Edit::Paste("line one\r\nline two".to_string()));
        assert_eq!(buf.text(), "line one line two");
        assert_eq!(buf.cursor(), buf.text().len());
    }

    #[test]
    fn home_end_report_movement() {
        let mut buf = typed("xy");
        assert!(!buf.apply(Edit::End));
        assert!(buf.apply(Edit::Home));
        assert!(!buf.apply(Edit::Home));
    }

    #[test]
    fn take_empties_and_resets_cursor() {
        let mut buf = typed("hello");
        assert_eq!(buf.take(), "hello");
        assert_eq!(buf.text(), "");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn blank_detection() {
        assert!(typed("   ").is_blank());
        assert!(!typed(" x ").is_blank());
    }
}
