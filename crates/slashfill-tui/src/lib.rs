//! slashfill TUI: ratatui application shell.
//!
//! The left pane is a form of named fields wired to the slash-command
//! suggest engine; the right pane manages the stored entries.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

use std::sync::Arc;

pub use app::App;
use app::AppState;
use slashfill_core::{config::Config, EntryStore};
use tokio::runtime::Handle;

/// Everything the TUI needs from its caller.
pub struct RunOptions {
    /// Form field labels, top to bottom.
    pub fields: Vec<String>,
    pub config: Config,
    pub store: Arc<dyn EntryStore>,
    /// Runtime that store reads and writes are spawned on.
    pub runtime: Handle,
    /// Shown in the header, usually the store path.
    pub store_label: String,
}

/// What the user left the form with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// True when the user left with `:w`.
    pub submitted: bool,
    /// `(label, value)` for every form field.
    pub fields: Vec<(String, String)>,
}

/// Start the TUI and block until the user quits.
pub fn run(options: RunOptions) -> anyhow::Result<RunOutcome> {
    let RunOptions {
        fields,
        config,
        store,
        runtime,
        store_label,
    } = options;
    let state = AppState::new(&fields, config, store, runtime, store_label);
    let state = App::new(state).run()?;
    Ok(RunOutcome {
        submitted: state.submitted,
        fields: state.form.values(),
    })
}
