//! Header widget: the 1-line strip at the top of the screen.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use slashfill_core::InsertionMode;

/// Shows the store location and insertion mode on the left and keybinding
/// hints (`Ctrl+c:quit  ?:help`) right-aligned in the same row.
pub struct Header<'a> {
    store_label: &'a str,
    entries: usize,
    insertion: InsertionMode,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        store_label: &'a str,
        entries: usize,
        insertion: InsertionMode,
        theme: &'a Theme,
    ) -> Self {
        Self {
            store_label,
            entries,
            insertion,
            theme,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" slashfill ", self.theme.entries_header),
            Span::raw(format!(" {} ", self.store_label)),
            Span::styled(
                format!("({} entries, {})", self.entries, self.insertion),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);

        let hint = " Ctrl+c:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
