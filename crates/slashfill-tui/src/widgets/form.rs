//! Form pane: the stack of named text fields the user fills in.
//!
//! The form is the "document" the suggestion engine observes. Fields are
//! laid out top to bottom, [`FIELD_HEIGHT`] rows each, in document
//! coordinates; `scroll` is how many document rows are hidden above the
//! viewport. Only fully visible fields are drawn.

use std::cell::Cell;

use crate::theme::Theme;
use crate::widgets::text_input::{TextInput, TextInputState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Widget},
};

/// Rows taken by one bordered field.
pub const FIELD_HEIGHT: u16 = 3;

/// Stable identifier of a form field, handed to the suggestion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub usize);

#[derive(Debug, Clone)]
pub struct Field {
    pub id: FieldId,
    pub label: String,
    pub input: TextInputState,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FormState {
    pub fields: Vec<Field>,
    /// Index into `fields` of the field that last had focus.
    pub current: usize,
    /// Document rows hidden above the viewport.
    pub scroll: u16,
    next_id: usize,
    /// Viewport height cached from the last render.
    last_height: Cell<u16>,
}

impl FormState {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        let mut form = Self {
            fields: Vec::new(),
            current: 0,
            scroll: 0,
            next_id: 0,
            last_height: Cell::new(24),
        };
        for label in labels {
            form.add_field(label);
        }
        form
    }

    /// Append a field and return its id. Ids are never reused.
    pub fn add_field(&mut self, label: impl Into<String>) -> FieldId {
        let id = FieldId(self.next_id);
        self.next_id += 1;
        self.fields.push(Field {
            id,
            label: label.into(),
            input: TextInputState::default(),
        });
        id
    }

    /// Remove a field. Any reference to its id becomes stale.
    pub fn remove_field(&mut self, id: FieldId) -> Option<Field> {
        let index = self.index_of(id)?;
        let field = self.fields.remove(index);
        if self.current >= self.fields.len() {
            self.current = self.fields.len().saturating_sub(1);
        }
        Some(field)
    }

    pub fn index_of(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    pub fn current_id(&self) -> Option<FieldId> {
        self.fields.get(self.current).map(|f| f.id)
    }

    /// Make `id` current and scroll it into view.
    pub fn focus(&mut self, id: FieldId) {
        if let Some(index) = self.index_of(id) {
            self.current = index;
            self.ensure_visible(index);
        }
    }

    fn ensure_visible(&mut self, index: usize) {
        let top = index as u16 * FIELD_HEIGHT;
        let bottom = top + FIELD_HEIGHT;
        let height = self.last_height.get().max(FIELD_HEIGHT);
        if top < self.scroll {
            self.scroll = top;
        } else if bottom > self.scroll + height {
            self.scroll = bottom - height;
        }
    }

    /// Viewport rect of field `index` inside the form's inner area, or
    /// `None` if it is not fully visible.
    pub fn field_rect(&self, inner: Rect, index: usize) -> Option<Rect> {
        let top = (index as u16 * FIELD_HEIGHT).checked_sub(self.scroll)?;
        if top + FIELD_HEIGHT > inner.height {
            return None;
        }
        Some(Rect {
            x: inner.x,
            y: inner.y + top,
            width: inner.width,
            height: FIELD_HEIGHT,
        })
    }

    /// `(label, value)` for every field, in order.
    pub fn values(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| (f.label.clone(), f.input.value.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct Form<'a> {
    state: &'a FormState,
    /// Field that has keyboard focus, if focus is in the form at all.
    focused: Option<FieldId>,
    theme: &'a Theme,
}

impl<'a> Form<'a> {
    pub fn new(state: &'a FormState, focused: Option<FieldId>, theme: &'a Theme) -> Self {
        Self {
            state,
            focused,
            theme,
        }
    }

    /// Inner area the fields are laid out in.
    pub fn inner(area: Rect) -> Rect {
        Block::bordered().inner(area)
    }

    /// Terminal cursor position for the focused field, if it is visible.
    pub fn cursor_position(&self, area: Rect) -> Option<(u16, u16)> {
        let id = self.focused?;
        let index = self.state.index_of(id)?;
        let rect = self.state.field_rect(Self::inner(area), index)?;
        let field = &self.state.fields[index];
        Some(TextInput::new(&field.input, &field.label, self.theme.border_focused).cursor_position(rect))
    }
}

impl Widget for Form<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Form ")
            .border_style(self.theme.border(self.focused.is_some()));
        let inner = block.inner(area);
        block.render(area, buf);
        self.state.last_height.set(inner.height);

        for (index, field) in self.state.fields.iter().enumerate() {
            let Some(rect) = self.state.field_rect(inner, index) else {
                continue;
            };
            let style = self.theme.border(self.focused == Some(field.id));
            TextInput::new(&field.input, &field.label, style)
                .placeholder("type / to insert a snippet")
                .render(rect, buf);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut form = FormState::new(["a", "b"]);
        form.remove_field(FieldId(1));
        assert_eq!(form.add_field("c"), FieldId(2));
        assert!(form.get(FieldId(1)).is_none());
    }

    #[test]
    fn field_rect_accounts_for_scroll() {
        let mut form = FormState::new(["a", "b", "c"]);
        let inner = Rect::new(1, 1, 20, 6);
        assert_eq!(form.field_rect(inner, 1), Some(Rect::new(1, 4, 20, 3)));
        assert_eq!(form.field_rect(inner, 2), None);

        form.scroll = 3;
        assert_eq!(form.field_rect(inner, 0), None);
        assert_eq!(form.field_rect(inner, 2), Some(Rect::new(1, 4, 20, 3)));
    }

    #[test]
    fn focusing_scrolls_field_into_view() {
        let mut form = FormState::new(["a", "b", "c", "d"]);
        form.last_height.set(6);
        form.focus(FieldId(3));
        assert_eq!(form.scroll, 6);
        form.focus(FieldId(0));
        assert_eq!(form.scroll, 0);
    }

    #[test]
    fn values_preserve_order() {
        let mut form = FormState::new(["user", "password"]);
        form.fields[1].input.set("hunter2".to_string(), 7);
        assert_eq!(
            form.values(),
            vec![
                ("user".to_string(), String::new()),
                ("password".to_string(), "hunter2".to_string())
            ]
        );
    }
}
