//! Single-line text input: used by form fields, the entries filter, the
//! edit modal and the command bar.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` / `Delete` remove the character before / under the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor one character.
//! - `Home` / `End` jump to either end.

use crate::event::{AppEvent, Direction};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInputState {
    pub value: String,
    /// Byte offset of the cursor within `value`.
    pub cursor: usize,
}

impl TextInputState {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Replace the whole value and put the cursor at `cursor` (clamped).
    pub fn set(&mut self, value: String, cursor: usize) {
        self.cursor = cursor.min(value.len());
        self.value = value;
        while !self.value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    /// Apply an editing event. Returns true when the value or the cursor
    /// changed; other events are ignored and return false.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        let before = self.cursor;
        match event {
            AppEvent::Char(c) => {
                self.value.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                true
            }
            AppEvent::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let prev = self.prev_boundary();
                self.value.remove(prev);
                self.cursor = prev;
                true
            }
            AppEvent::Delete => {
                if self.cursor >= self.value.len() {
                    return false;
                }
                self.value.remove(self.cursor);
                true
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = self.prev_boundary();
                self.cursor != before
            }
            AppEvent::Nav(Direction::Right) => {
                self.cursor = self.next_boundary();
                self.cursor != before
            }
            AppEvent::Home => {
                self.cursor = 0;
                self.cursor != before
            }
            AppEvent::End => {
                self.cursor = self.value.len();
                self.cursor != before
            }
            _ => false,
        }
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.value.len())
    }

    /// Column of the cursor, counted in characters.
    pub fn cursor_col(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    /// First visible character so that the cursor fits in `width` columns.
    pub fn scroll_for(&self, width: u16) -> usize {
        let width = width.max(1) as usize;
        self.cursor_col().saturating_sub(width - 1)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// A bordered, titled text input.
pub struct TextInput<'a> {
    state: &'a TextInputState,
    title: &'a str,
    placeholder: &'a str,
    border_style: Style,
}

impl<'a> TextInput<'a> {
    pub fn new(state: &'a TextInputState, title: &'a str, border_style: Style) -> Self {
        Self {
            state,
            title,
            placeholder: "",
            border_style,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let inner_width = area.width.saturating_sub(2);
        let col = (self.state.cursor_col() - self.state.scroll_for(inner_width)) as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(2));
        (x, area.y + 1)
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.title)
            .border_style(self.border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.state.value.is_empty() {
            Line::from(Span::styled(
                self.placeholder,
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            let skip = self.state.scroll_for(inner.width);
            let visible: String = self.state.value.chars().skip(skip).collect();
            Line::from(visible)
        };
        Paragraph::new(line).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
