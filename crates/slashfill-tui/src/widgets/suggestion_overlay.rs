//! Suggestion overlay: the dropdown listing matches for an open `/command`.
//!
//! The overlay is anchored at the bottom-left corner of the observed field.
//! The anchor is kept in document coordinates (viewport position plus the
//! form's scroll offset) so it stays attached to the field while the form
//! scrolls; [`overlay_area`] converts it back to the viewport and clamps the
//! result to the screen.
//!
//! An empty suggestion list has no area and renders nothing.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};
use slashfill_core::Suggestion;

/// Bottom-left corner of the anchoring field, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub x: u16,
    pub y: u16,
}

impl Anchor {
    /// Anchor for a field drawn at `field` in the viewport while `scroll`
    /// rows of the document are hidden above it.
    pub fn for_field(field: Rect, scroll: u16) -> Self {
        Self {
            x: field.x,
            y: field.bottom() + scroll,
        }
    }
}

/// Where to draw an overlay of `count` rows, or `None` when there is
/// nothing to show.
pub fn overlay_area(
    anchor: Anchor,
    scroll: u16,
    bounds: Rect,
    count: usize,
    max_items: u16,
    width: u16,
) -> Option<Rect> {
    if count == 0 || bounds.is_empty() {
        return None;
    }
    let rows = u16::try_from(count)
        .unwrap_or(u16::MAX)
        .min(max_items.max(1));
    let height = rows.saturating_add(2).min(bounds.height);
    let width = width.min(bounds.width);

    let mut y = anchor.y.saturating_sub(scroll).max(bounds.y);
    if y.saturating_add(height) > bounds.bottom() {
        y = bounds.bottom() - height;
    }
    let mut x = anchor.x.max(bounds.x);
    if x.saturating_add(width) > bounds.right() {
        x = bounds.right() - width;
    }
    Some(Rect {
        x,
        y,
        width,
        height,
    })
}

pub struct SuggestionOverlay<'a> {
    suggestions: &'a [Suggestion],
    highlighted: usize,
    theme: &'a Theme,
}

impl<'a> SuggestionOverlay<'a> {
    pub fn new(suggestions: &'a [Suggestion], highlighted: usize, theme: &'a Theme) -> Self {
        Self {
            suggestions,
            highlighted,
            theme,
        }
    }

    fn row(&self, suggestion: &Suggestion, width: usize, highlighted: bool) -> Line<'a> {
        let tag = format!(" {} ", suggestion.tag);
        let tag_width = tag.chars().count();
        let key_width = suggestion.key.chars().count();
        let room = width.saturating_sub(key_width + tag_width + 2);
        let preview = truncate(&suggestion.value, room);
        let gap = width.saturating_sub(key_width + 2 + preview.chars().count() + tag_width);

        let mut line = Line::from(vec![
            Span::raw(suggestion.key.clone()),
            Span::raw(": "),
            Span::styled(preview, self.theme.overlay_value),
            Span::raw(" ".repeat(gap)),
            Span::styled(tag, self.theme.tag_style(&suggestion.tag)),
        ]);
        if highlighted {
            line = line.style(self.theme.overlay_highlight);
        }
        line
    }
}

impl Widget for SuggestionOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.suggestions.is_empty() {
            return;
        }
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(format!(" /{} ", self.suggestions.len()))
            .border_style(self.theme.overlay_border);
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height.max(1) as usize;
        let start = self.highlighted.saturating_sub(visible - 1);
        let width = inner.width as usize;

        let lines: Vec<Line> = self
            .suggestions
            .iter()
            .enumerate()
            .skip(start)
            .take(visible)
            .map(|(i, s)| self.row(s, width, i == self.highlighted))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
