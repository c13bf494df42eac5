//! slashfill-core: entries, store, and the slash-command suggestion engine.
//!
//! # Architecture
//!
//! ```text
//! InputObserver ──► trigger ──► SuggestionQueries ──► EntryStore
//!                                      │                  │
//!                                      └──── matcher ◄────┘
//!                                      ▼
//!                                SuggestEngine ──► Overlay / Commit
//! ```
//!
//! The engine only ever reads the store. The write path (insert, update,
//! remove, import) is driven by the TUI entry manager and the CLI.

pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod observer;
pub mod query;
pub mod store;
pub mod trigger;
pub mod types;

pub use engine::{Commit, Overlay, SuggestEngine};
pub use error::StoreError;
pub use store::{EntryMap, EntryStore, JsonFileStore, MemoryStore};
pub use types::{Entry, EntryId, InsertionMode, Suggestion};
