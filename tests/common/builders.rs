//! Test builders: ergonomic constructors for entries, stores and engines.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use slashfill_core::store::render_document;
use slashfill_core::{
    Entry, EntryMap, EntryStore, InsertionMode, JsonFileStore, MemoryStore, SuggestEngine,
};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Identifier the harnesses use for text inputs.
pub type InputId = u32;

pub fn entry(key: &str, value: &str, tag: &str) -> Entry {
    Entry::new(key, value, tag)
}

// ---------------------------------------------------------------------------
// StoreBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for populated stores.
///
/// # Example
///
/// ```rust
/// let store = StoreBuilder::new()
///     .entry("token", "abc123", "prod")
///     .memory();
/// ```
#[derive(Default)]
pub struct StoreBuilder {
    entries: Vec<Entry>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, key: &str, value: &str, tag: &str) -> Self {
        self.entries.push(entry(key, value, tag));
        self
    }

    pub fn entries(mut self, entries: impl IntoIterator<Item = Entry>) -> Self {
        self.entries.extend(entries);
        self
    }

    pub fn memory(self) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_entries(self.entries))
    }

    /// Write the entries as a store document at `path` and open it.
    pub fn file(self, path: &Path) -> JsonFileStore {
        let map: EntryMap = self.entries.into_iter().map(|e| (e.id(), e)).collect();
        let document = render_document(&map).expect("render store document");
        std::fs::write(path, document).expect("write store document");
        JsonFileStore::new(path)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// An engine over `store` on the current tokio runtime.
pub fn engine(store: Arc<dyn EntryStore>) -> SuggestEngine<InputId> {
    engine_with(store, InsertionMode::ReplaceValue)
}

pub fn engine_with(store: Arc<dyn EntryStore>, insertion: InsertionMode) -> SuggestEngine<InputId> {
    SuggestEngine::new(store, Handle::current(), insertion)
}

/// Keys of the suggestions currently shown, in display order.
pub fn shown_keys(engine: &SuggestEngine<InputId>) -> Vec<String> {
    engine
        .overlay()
        .suggestions()
        .iter()
        .map(|s| s.key.clone())
        .collect()
}
