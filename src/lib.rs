//! slashfill: store key/value/tag snippets and insert them into text inputs
//! by typing `/` followed by part of a key.
//!
//! # Architecture
//!
//! ```text
//! EntryStore ──► SuggestEngine ──► TUI form
//!     │
//!     └──► entries pane / CLI (insert, update, remove, import, export)
//! ```
//!
//! The engine and store live in `slashfill-core`, the terminal UI in
//! `slashfill-tui`. This crate holds the command-line surface so that the
//! integration harnesses can run subcommands without a terminal.

pub mod cli;
