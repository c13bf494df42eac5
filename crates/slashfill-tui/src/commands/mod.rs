// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use crate::{app::AppState, theme::Theme};
use anyhow::Context;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Leave without printing the form
    Quit,
    // Leave and print the form values
    Submit,
    // Toggle the help popup
    Help,
    // Change theme
    Theme(String),
    // Merge a JSON document into the store
    Import(PathBuf),
    // Write the store as a JSON document
    Export(PathBuf),
    // Re-read the store from disk
    Reload,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "w" | "wq" | "submit" => Ok(Command::Submit),
            "help" => Ok(Command::Help),
            "reload" => Ok(Command::Reload),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "import" => {
                if rest.is_empty() {
                    Err("usage: import <path>".to_string())
                } else {
                    Ok(Command::Import(PathBuf::from(rest)))
                }
            }
            "export" => {
                if rest.is_empty() {
                    Err("usage: export <path>".to_string())
                } else {
                    Ok(Command::Export(PathBuf::from(rest)))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Quit => {
            s.quit = true;
        }
        Command::Submit => {
            s.submitted = true;
            s.quit = true;
        }
        Command::Help => {
            s.show_help = !s.show_help;
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
            s.info(format!("theme: {}", s.theme.name));
        }
        Command::Import(path) => {
            let document = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let count = s.block_on_store(|store| async move { store.import(&document).await })?;
            s.reload_entries()?;
            s.info(format!("imported {count} entries from {}", path.display()));
        }
        Command::Export(path) => {
            let document = s.block_on_store(|store| async move { store.export().await })?;
            std::fs::write(&path, document)
                .with_context(|| format!("writing {}", path.display()))?;
            s.info(format!("exported {} entries to {}", s.entries.len(), path.display()));
        }
        Command::Reload => {
            s.reload_entries()?;
            s.info(format!("reloaded {} entries", s.entries.len()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
