//! Entries pane: every stored entry, with a search filter and marks.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k`, `↓` / `j` | Move the cursor |
//! | `PageUp` / `PageDown` | Move the cursor one page |
//! | `Space` | Toggle the mark on the entry under the cursor |
//! | `a` | Mark every visible entry, or clear marks if all are marked |
//! | `/` | Focus the filter |
//!
//! Deleting and editing are handled by the app shell, which owns the store.

use std::cell::Cell;
use std::collections::BTreeSet;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use crate::widgets::text_input::TextInputState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};
use slashfill_core::matcher::filter_entries;
use slashfill_core::{Entry, EntryId, EntryMap};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct EntryTableState {
    entries: EntryMap,
    pub filter: TextInputState,
    /// Index into the visible (filtered) rows.
    pub cursor: usize,
    pub marked: BTreeSet<EntryId>,
    /// Number of rows visible at the last render.
    last_height: Cell<usize>,
}

impl EntryTableState {
    /// Swap in a fresh snapshot, dropping marks for entries that are gone.
    pub fn replace(&mut self, entries: EntryMap) {
        self.marked.retain(|id| entries.contains_key(id));
        self.entries = entries;
        self.clamp_cursor();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows matching the current filter, in identifier order.
    pub fn visible(&self) -> Vec<(&EntryId, &Entry)> {
        filter_entries(&self.filter.value, self.entries.iter())
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<(EntryId, Entry)> {
        self.visible()
            .get(self.cursor)
            .map(|(id, entry)| ((*id).clone(), (*entry).clone()))
    }

    /// Marked ids, or the id under the cursor when nothing is marked.
    pub fn selection(&self) -> Vec<EntryId> {
        if self.marked.is_empty() {
            self.current().map(|(id, _)| vec![id]).unwrap_or_default()
        } else {
            self.marked.iter().cloned().collect()
        }
    }

    /// Apply a filter edit and keep the cursor on a visible row.
    pub fn edit_filter(&mut self, event: &AppEvent) -> bool {
        let changed = self.filter.handle(event);
        if changed {
            self.clamp_cursor();
        }
        changed
    }

    fn clamp_cursor(&mut self) {
        let rows = self.visible().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    fn toggle_mark(&mut self) {
        if let Some((id, _)) = self.current() {
            if !self.marked.remove(&id) {
                self.marked.insert(id);
            }
        }
    }

    fn toggle_all(&mut self) {
        let visible: Vec<EntryId> = self.visible().into_iter().map(|(id, _)| id.clone()).collect();
        let all_marked = !visible.is_empty() && visible.iter().all(|id| self.marked.contains(id));
        if all_marked {
            self.marked.clear();
        } else {
            self.marked.extend(visible);
        }
    }

    /// Handle a navigation or marking event. Returns true if it was consumed.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        let rows = self.visible().len();
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < rows {
                    self.cursor += 1;
                }
            }
            AppEvent::PageUp => {
                self.cursor = self.cursor.saturating_sub(self.page());
            }
            AppEvent::PageDown => {
                self.cursor = (self.cursor + self.page()).min(rows.saturating_sub(1));
            }
            AppEvent::Char(' ') => self.toggle_mark(),
            AppEvent::Char('a') => self.toggle_all(),
            _ => return false,
        }
        tracing::debug!(cursor = self.cursor, marked = self.marked.len(), "entries: handled");
        true
    }

    fn page(&self) -> usize {
        match self.last_height.get() {
            0 => PAGE_STEP,
            h => h,
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct EntryTable<'a> {
    state: &'a EntryTableState,
    focused: bool,
    filter_focused: bool,
    theme: &'a Theme,
}

impl<'a> EntryTable<'a> {
    pub fn new(
        state: &'a EntryTableState,
        focused: bool,
        filter_focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            focused,
            filter_focused,
            theme,
        }
    }

    /// Terminal cursor position inside the filter line.
    pub fn filter_cursor_position(&self, area: Rect) -> (u16, u16) {
        let inner = Block::bordered().inner(area);
        let col = FILTER_PREFIX.len() as u16 + self.state.filter.cursor_col() as u16;
        ((inner.x + col).min(inner.right().saturating_sub(1)), inner.y)
    }
}

const FILTER_PREFIX: &str = "filter: ";

impl Widget for EntryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.state.visible();
        let title = format!(" Entries ({}/{}) ", visible.len(), self.state.len());
        let block = Block::bordered()
            .title(title)
            .border_style(self.theme.border(self.focused || self.filter_focused));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 3 {
            return;
        }

        // Filter line
        let filter_line = if self.state.filter.value.is_empty() && !self.filter_focused {
            Line::from(Span::styled(
                "press / to search (key, value, tag)",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(vec![
                Span::styled(FILTER_PREFIX, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(self.state.filter.value.as_str()),
            ])
        };
        buf.set_line(inner.x, inner.y, &filter_line, inner.width);

        // Column widths: mark(4) | key 30% | value | tag 20%
        let width = inner.width as usize;
        let key_w = (width.saturating_sub(4) * 30 / 100).max(4);
        let tag_w = (width.saturating_sub(4) * 20 / 100).max(3);
        let value_w = width.saturating_sub(4 + key_w + tag_w + 2);

        let header = format!(
            "    {} {} {}",
            fit("Key", key_w),
            fit("Value", value_w),
            fit("Tag", tag_w)
        );
        buf.set_string(inner.x, inner.y + 1, fit(&header, width), self.theme.entries_header);

        let body_top = inner.y + 2;
        let body_height = (inner.height - 2) as usize;
        self.state.last_height.set(body_height);

        if visible.is_empty() {
            buf.set_string(
                inner.x,
                body_top,
                fit("    No data found", width),
                Style::default().add_modifier(Modifier::DIM),
            );
            return;
        }

        let start = self.state.cursor.saturating_sub(body_height.saturating_sub(1));
        for (row, (i, (id, entry))) in visible
            .iter()
            .enumerate()
            .skip(start)
            .take(body_height)
            .enumerate()
        {
            let y = body_top + row as u16;
            let marked = self.state.marked.contains(*id);
            let mark = if marked { "[x] " } else { "[ ] " };

            let mut style = if marked {
                self.theme.entries_marked
            } else {
                Style::default()
            };
            if self.focused && i == self.state.cursor {
                style = style.patch(self.theme.entries_cursor);
            }

            let line = Line::from(vec![
                Span::raw(mark),
                Span::raw(fit(&entry.key, key_w)),
                Span::raw(" "),
                Span::raw(fit(&entry.value, value_w)),
                Span::raw(" "),
                Span::styled(fit(&entry.tag, tag_w), self.theme.tag_style(&entry.tag)),
            ])
            .style(style);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

/// Pad or truncate `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text}{}", " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let mut out: String = text.chars().take(width - 1).collect();
        out.push('…');
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
