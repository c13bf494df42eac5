//! Command-line surface: argument types and the non-interactive subcommands.
//!
//! With no subcommand the binary runs the TUI. Every subcommand runs once
//! against the store and writes its result to the given writer, so the
//! harness tests can drive them without a terminal.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use slashfill_core::matcher::{filter_entries, match_suggestions};
use slashfill_core::store::render_document;
use slashfill_core::trigger;
use slashfill_core::{Entry, EntryId, EntryMap, EntryStore};

/// Form fields shown when no `--field` is given.
pub const DEFAULT_FIELDS: &[&str] = &["field 1", "field 2", "field 3"];

#[derive(Debug, Parser)]
#[command(
    name = "slashfill",
    about = "SlashFill — store snippets and insert them into text inputs with /commands"
)]
pub struct Cli {
    /// Write debug logs to /tmp/slashfill-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Entries file to use instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Label of a form field; repeat for several fields.
    #[arg(long = "field", value_name = "NAME")]
    pub fields: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Commands {
    /// List stored entries.
    List {
        /// Only entries whose key, value or tag contains TERM.
        #[arg(long, value_name = "TERM")]
        search: Option<String>,
        /// Print the entries as a JSON document.
        #[arg(long)]
        json: bool,
    },
    /// Add an entry.
    Add {
        key: String,
        value: String,
        #[arg(long)]
        tag: String,
    },
    /// Remove entries by id (`tag-key`).
    Rm {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Merge a JSON document of entries into the store.
    Import { path: PathBuf },
    /// Write the store as a JSON document to PATH, or stdout.
    Export { path: Option<PathBuf> },
    /// Run slash-command detection on TEXT and print the suggestions.
    Suggest {
        text: String,
        /// Byte offset of the cursor; defaults to the end of TEXT.
        #[arg(long)]
        cursor: Option<usize>,
    },
}

impl Cli {
    /// Field labels for the TUI form.
    pub fn field_labels(&self) -> Vec<String> {
        if self.fields.is_empty() {
            DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect()
        } else {
            self.fields.clone()
        }
    }
}

/// Run one subcommand against `store`, writing human output to `out`.
pub async fn execute(
    command: Commands,
    store: &dyn EntryStore,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    tracing::debug!(?command, "running subcommand");
    match command {
        Commands::List { search, json } => {
            let entries = store.fetch_all().await?;
            let term = search.unwrap_or_default();
            let rows = filter_entries(&term, entries.iter());
            if json {
                let selected: EntryMap = rows
                    .into_iter()
                    .map(|(id, entry)| (id.clone(), entry.clone()))
                    .collect();
                writeln!(out, "{}", render_document(&selected)?)?;
            } else if rows.is_empty() {
                writeln!(out, "No data found")?;
            } else {
                for (id, entry) in rows {
                    writeln!(out, "{id}\t{}\t{}\t{}", entry.key, entry.value, entry.tag)?;
                }
            }
        }
        Commands::Add { key, value, tag } => {
            let entry = Entry::new(key.trim(), value.trim(), tag.trim());
            if !entry.is_complete() {
                anyhow::bail!("key, value and tag are all required");
            }
            let id = store.insert(entry).await?;
            writeln!(out, "added {id}")?;
        }
        Commands::Rm { ids } => {
            let ids: Vec<EntryId> = ids.into_iter().map(EntryId::from).collect();
            let removed = store.remove(&ids).await?;
            writeln!(out, "removed {removed} of {} entries", ids.len())?;
        }
        Commands::Import { path } => {
            let document = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let count = store.import(&document).await?;
            writeln!(out, "imported {count} entries from {}", path.display())?;
        }
        Commands::Export { path } => {
            let document = store.export().await?;
            match path {
                Some(path) => {
                    std::fs::write(&path, &document)
                        .with_context(|| format!("writing {}", path.display()))?;
                    writeln!(out, "exported to {}", path.display())?;
                }
                None => writeln!(out, "{document}")?,
            }
        }
        Commands::Suggest { text, cursor } => {
            let cursor = cursor.unwrap_or(text.len());
            let Some(open) = trigger::detect(&text, cursor) else {
                writeln!(out, "no slash command before the cursor")?;
                return Ok(());
            };
            let entries = store.fetch_all().await?;
            let suggestions = match_suggestions(&open.fragment, entries.values());
            if suggestions.is_empty() {
                writeln!(out, "no suggestions for /{}", open.fragment)?;
            }
            for s in suggestions {
                writeln!(out, "{}\t{}\t{}", s.key, s.value, s.tag)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
