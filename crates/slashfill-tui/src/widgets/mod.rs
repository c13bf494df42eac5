//! Ratatui widgets for the slashfill TUI.

pub mod command_bar;
pub mod edit_modal;
pub mod entry_table;
pub mod form;
pub mod header;
pub mod help;
pub mod suggestion_overlay;
pub mod text_input;
