//! Edit modal: create a new entry or edit an existing one.
//!
//! `Tab` / `Shift+Tab` cycle the Key, Value and Tag inputs, `Enter` saves and
//! `Esc` cancels. Store errors (duplicates, I/O) are shown inside the modal,
//! which stays open so the user can fix the input.

use crate::event::AppEvent;
use crate::theme::Theme;
use crate::widgets::help::centered_rect;
use crate::widgets::text_input::{TextInput, TextInputState};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
};
use slashfill_core::{Entry, EntryId};

const LABELS: [&str; 3] = [" Key ", " Value ", " Tag "];
const MODAL_WIDTH: u16 = 60;
const MODAL_HEIGHT: u16 = 3 * 3 + 3;

/// What the app shell should do after a key press in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Save(Entry),
    Cancel,
}

#[derive(Debug, Default)]
pub struct EditModalState {
    /// Entry being edited, or `None` when creating.
    pub original: Option<EntryId>,
    pub fields: [TextInputState; 3],
    pub focused: usize,
    pub error: Option<String>,
}

impl EditModalState {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(id: EntryId, entry: &Entry) -> Self {
        Self {
            original: Some(id),
            fields: [
                TextInputState::with_value(entry.key.as_str()),
                TextInputState::with_value(entry.value.as_str()),
                TextInputState::with_value(entry.tag.as_str()),
            ],
            focused: 0,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.original.is_some() {
            " Edit entry "
        } else {
            " New entry "
        }
    }

    /// The entry described by the current inputs, trimmed.
    pub fn entry(&self) -> Entry {
        Entry::new(
            self.fields[0].value.trim(),
            self.fields[1].value.trim(),
            self.fields[2].value.trim(),
        )
    }

    pub fn handle(&mut self, event: &AppEvent) -> ModalAction {
        match event {
            AppEvent::Escape => ModalAction::Cancel,
            AppEvent::FocusNext | AppEvent::Nav(crate::event::Direction::Down) => {
                self.focused = (self.focused + 1) % self.fields.len();
                ModalAction::None
            }
            AppEvent::FocusPrev | AppEvent::Nav(crate::event::Direction::Up) => {
                self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
                ModalAction::None
            }
            AppEvent::Enter => {
                let entry = self.entry();
                if !entry.is_complete() {
                    self.error = Some("key, value and tag are all required".to_string());
                    return ModalAction::None;
                }
                ModalAction::Save(entry)
            }
            other => {
                if self.fields[self.focused].handle(other) {
                    self.error = None;
                }
                ModalAction::None
            }
        }
    }
}

pub struct EditModal<'a> {
    state: &'a EditModalState,
    theme: &'a Theme,
}

impl<'a> EditModal<'a> {
    pub fn new(state: &'a EditModalState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn area(screen: Rect) -> Rect {
        centered_rect(MODAL_WIDTH, MODAL_HEIGHT, screen)
    }

    fn field_rects(inner: Rect) -> [Rect; 4] {
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(inner)
    }

    /// Terminal cursor position inside the focused input.
    pub fn cursor_position(&self, screen: Rect) -> (u16, u16) {
        let inner = Block::bordered().inner(Self::area(screen));
        let rects = Self::field_rects(inner);
        let i = self.state.focused;
        TextInput::new(&self.state.fields[i], LABELS[i], self.theme.border_focused)
            .cursor_position(rects[i])
    }
}

impl Widget for EditModal<'_> {
    fn render(self, screen: Rect, buf: &mut Buffer) {
        let area = Self::area(screen);
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(self.state.title())
            .border_style(self.theme.border_command_bar);
        let inner = block.inner(area);
        block.render(area, buf);

        let rects = Self::field_rects(inner);
        for (i, (input, label)) in self.state.fields.iter().zip(LABELS).enumerate() {
            TextInput::new(input, label, self.theme.border(i == self.state.focused))
                .render(rects[i], buf);
        }

        let footer = match &self.state.error {
            Some(err) => Line::from(Span::styled(err.as_str(), self.theme.status_error)),
            None => Line::from(Span::styled(
                "Enter save · Tab next field · Esc cancel",
                self.theme.status_info,
            )),
        };
        buf.set_line(rects[3].x, rects[3].y, &footer, rects[3].width);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(modal: &mut EditModalState, text: &str) {
        for c in text.chars() {
            modal.handle(&AppEvent::Char(c));
        }
    }

    #[test]
    fn new_entry_flow() {
        let mut m = EditModalState::create();
        type_str(&mut m, "token");
        m.handle(&AppEvent::FocusNext);
        type_str(&mut m, "abc123");
        m.handle(&AppEvent::FocusNext);
        type_str(&mut m, "prod");
        assert_eq!(
            m.handle(&AppEvent::Enter),
            ModalAction::Save(Entry::new("token", "abc123", "prod"))
        );
    }

    #[test]
    fn incomplete_entry_shows_error() {
        let mut m = EditModalState::create();
        type_str(&mut m, "token");
        assert_eq!(m.handle(&AppEvent::Enter), ModalAction::None);
        assert!(m.error.is_some());
        type_str(&mut m, "s");
        assert!(m.error.is_none());
    }

    #[test]
    fn edit_prefills_and_cycles_backwards() {
        let entry = Entry::new("db", "hunter2", "dev");
        let mut m = EditModalState::edit(entry.id(), &entry);
        assert_eq!(m.title(), " Edit entry ");
        m.handle(&AppEvent::FocusPrev);
        assert_eq!(m.focused, 2);
        assert_eq!(m.fields[2].value, "dev");
    }

    #[test]
    fn escape_cancels() {
        let mut m = EditModalState::create();
        assert_eq!(m.handle(&AppEvent::Escape), ModalAction::Cancel);
    }
}
