//! Help popup: centred floating overlay listing all keybindings.
//!
//! Toggle with `?` from the entries pane or `:help`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("Form", ""),
    ("  /name", "Open suggestions for entries whose key contains name"),
    ("  ↑  /  ↓", "Move the suggestion highlight"),
    ("  Enter  /  Tab", "Insert the highlighted suggestion"),
    ("  Esc", "Close suggestions, then leave the form"),
    ("  Enter", "Next field (no suggestions open)"),
    ("Entries", ""),
    ("  ↑ k  /  ↓ j", "Move the cursor"),
    ("  Space  /  a", "Mark entry / mark all"),
    ("  n  /  e  /  d", "New / edit / delete entries"),
    ("  /", "Search key, value and tag"),
    ("  :", "Command line (w, q, import, export, theme)"),
    ("Anywhere", ""),
    ("  Tab  /  Shift+Tab", "Cycle focus between panes"),
    ("  Ctrl+c", "Quit"),
    ("  ?", "Toggle this help popup"),
];

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(76, BINDINGS.len() as u16 + 2, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" slashfill keybindings (? to close) ")
            .border_style(self.theme.border_command_bar);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, desc)| {
                if desc.is_empty() {
                    return Line::from(Span::styled(*key, self.theme.entries_header));
                }
                Line::from(vec![
                    Span::styled(
                        format!("{:<22}", key),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
