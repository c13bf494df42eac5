//! Store: persistent mapping of [`EntryId`] to [`Entry`].
//!
//! The store is the single source of truth. The suggestion engine only ever
//! calls [`EntryStore::fetch_all`]; the write path (`insert`, `update`,
//! `remove`, `import`) belongs to the management surface and is where the
//! identifier uniqueness invariant is enforced.
//!
//! # Document format
//!
//! Both the on-disk file and the import/export format are one JSON object:
//!
//! ```json
//! {
//!   "prod-token": { "key": "token", "value": "abc123", "tag": "prod" }
//! }
//! ```
//!
//! Entries are enumerated in identifier order (the map is a `BTreeMap`).

use crate::error::{Result, StoreError};
use crate::types::{Entry, EntryId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

/// Snapshot of every well-formed entry, keyed and ordered by identifier.
pub type EntryMap = BTreeMap<EntryId, Entry>;

/// Async key/value store of entries.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Read every well-formed entry. Malformed records are skipped.
    async fn fetch_all(&self) -> Result<EntryMap>;

    /// Add a new entry. Fails with [`StoreError::Duplicate`] if its derived
    /// identifier is already taken.
    async fn insert(&self, entry: Entry) -> Result<EntryId>;

    /// Replace the entry stored under `original` with `entry`, which may
    /// derive a different identifier.
    async fn update(&self, original: &EntryId, entry: Entry) -> Result<EntryId>;

    /// Delete the given identifiers, returning how many existed.
    async fn remove(&self, ids: &[EntryId]) -> Result<usize>;

    /// Merge an exported document into the store, returning how many
    /// entries were added.
    async fn import(&self, document: &str) -> Result<usize>;

    /// Serialize the whole store as a pretty JSON document.
    async fn export(&self) -> Result<String> {
        render_document(&self.fetch_all().await?)
    }
}

// ---------------------------------------------------------------------------
// Document parsing
// ---------------------------------------------------------------------------

/// Parse a stored document, skipping records that are not complete entries.
pub fn parse_document(text: &str) -> Result<EntryMap> {
    Ok(split_document(text)?.entries)
}

/// A stored document split into the records that parse as entries and the
/// ones that do not. Writes carry `unparsed` through untouched.
#[derive(Debug, Default)]
struct Document {
    entries: EntryMap,
    unparsed: BTreeMap<String, serde_json::Value>,
}

fn split_document(text: &str) -> Result<Document> {
    let mut document = Document::default();
    if text.trim().is_empty() {
        return Ok(document);
    }

    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Object(object) = value else {
        return Err(StoreError::NotAnObject);
    };

    for (id, record) in object {
        match serde_json::from_value::<Entry>(record.clone()) {
            Ok(entry) => {
                document.entries.insert(EntryId::from(id), entry);
            }
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "skipping malformed entry");
                document.unparsed.insert(id, record);
            }
        }
    }
    Ok(document)
}

/// Render entries plus the records kept aside when reading. An entry
/// written under the same identifier replaces the unparsed record.
fn render_with_unparsed(
    entries: &EntryMap,
    unparsed: &BTreeMap<String, serde_json::Value>,
) -> Result<String> {
    let mut merged = unparsed.clone();
    for (id, entry) in entries {
        merged.insert(id.as_str().to_string(), serde_json::to_value(entry)?);
    }
    Ok(serde_json::to_string_pretty(&merged)?)
}

/// Render entries as the pretty-printed store document.
pub fn render_document(entries: &EntryMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Parse an import document. Unlike [`parse_document`], a single
/// incomplete item rejects the whole import.
pub fn parse_import(text: &str) -> Result<Vec<Entry>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Object(object) = value else {
        return Err(StoreError::InvalidImport(
            "expected a JSON object of id -> entry".to_string(),
        ));
    };

    object
        .into_iter()
        .map(|(id, record)| {
            let entry: Entry = serde_json::from_value(record)
                .map_err(|err| StoreError::InvalidImport(format!("{id}: {err}")))?;
            if !entry.is_complete() {
                return Err(StoreError::InvalidImport(format!(
                    "{id}: key, value and tag must all be non-empty"
                )));
            }
            Ok(entry)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Write path, shared by every backend
// ---------------------------------------------------------------------------

fn apply_insert(entries: &mut EntryMap, entry: Entry) -> Result<EntryId> {
    let id = entry.id();
    if entries.contains_key(&id) {
        return Err(StoreError::Duplicate(id));
    }
    entries.insert(id.clone(), entry);
    Ok(id)
}

fn apply_update(entries: &mut EntryMap, original: &EntryId, entry: Entry) -> Result<EntryId> {
    if !entries.contains_key(original) {
        return Err(StoreError::NotFound(original.clone()));
    }
    let id = entry.id();
    if &id != original {
        if entries.contains_key(&id) {
            return Err(StoreError::Duplicate(id));
        }
        entries.remove(original);
    }
    entries.insert(id.clone(), entry);
    Ok(id)
}

fn apply_remove(entries: &mut EntryMap, ids: &[EntryId]) -> usize {
    ids.iter().filter(|id| entries.remove(*id).is_some()).count()
}

fn apply_import(entries: &mut EntryMap, document: &str) -> Result<usize> {
    let imported = parse_import(document)?;

    let conflicts: Vec<String> = imported
        .iter()
        .filter(|entry| entries.contains_key(&entry.id()))
        .map(|entry| {
            format!(
                "Duplicate entry found for key: {} and tag: {}",
                entry.key, entry.tag
            )
        })
        .collect();
    if !conflicts.is_empty() {
        return Err(StoreError::ImportConflicts(conflicts));
    }

    let mut added = EntryMap::new();
    for entry in imported {
        added.insert(entry.id(), entry);
    }
    let count = added.len();
    entries.extend(added);
    Ok(count)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Volatile store, used for tests and the headless `suggest` command.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<EntryMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries, keyed by their derived identifiers.
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let map = entries.into_iter().map(|e| (e.id(), e)).collect();
        Self {
            entries: RwLock::new(map),
        }
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn fetch_all(&self) -> Result<EntryMap> {
        Ok(self.entries.read().await.clone())
    }

    async fn insert(&self, entry: Entry) -> Result<EntryId> {
        apply_insert(&mut *self.entries.write().await, entry)
    }

    async fn update(&self, original: &EntryId, entry: Entry) -> Result<EntryId> {
        apply_update(&mut *self.entries.write().await, original, entry)
    }

    async fn remove(&self, ids: &[EntryId]) -> Result<usize> {
        Ok(apply_remove(&mut *self.entries.write().await, ids))
    }

    async fn import(&self, document: &str) -> Result<usize> {
        apply_import(&mut *self.entries.write().await, document)
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Store backed by a single JSON document on disk.
///
/// Every read goes to the file, so edits made by another process (or by
/// `slashfill import` while the TUI is open) are visible on the next query.
/// Writes are serialized through a mutex and land via write-then-rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => split_document(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Document::default()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    async fn save(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let text = render_with_unparsed(&document.entries, &document.unparsed)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        tracing::debug!(
            path = %self.path.display(),
            count = document.entries.len(),
            kept_unparsed = document.unparsed.len(),
            "store saved"
        );
        Ok(())
    }

    /// Load, apply `change`, and save only if the change succeeded.
    /// Records that failed to parse are written back as they were.
    async fn modify<T>(&self, change: impl FnOnce(&mut EntryMap) -> Result<T> + Send) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        let out = change(&mut document.entries)?;
        self.save(&document).await?;
        Ok(out)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl EntryStore for JsonFileStore {
    async fn fetch_all(&self) -> Result<EntryMap> {
        Ok(self.load().await?.entries)
    }

    async fn insert(&self, entry: Entry) -> Result<EntryId> {
        self.modify(|entries| apply_insert(entries, entry)).await
    }

    async fn update(&self, original: &EntryId, entry: Entry) -> Result<EntryId> {
        self.modify(|entries| apply_update(entries, original, entry))
            .await
    }

    async fn remove(&self, ids: &[EntryId]) -> Result<usize> {
        self.modify(|entries| Ok(apply_remove(entries, ids))).await
    }

    async fn import(&self, document: &str) -> Result<usize> {
        self.modify(|entries| apply_import(entries, document)).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token() -> Entry {
        Entry::new("token", "abc123", "prod")
    }

    #[test]
    fn parse_skips_malformed_records() {
        let doc = r#"{
            "prod-token": {"key": "token", "value": "abc123", "tag": "prod"},
            "broken": {"key": "missing-value", "tag": "dev"},
            "junk": 42
        }"#;
        let entries = parse_document(doc).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[&EntryId::from("prod-token")], token());
    }

    #[test]
    fn parse_empty_text_is_empty_store() {
        assert!(parse_document("  \n").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_object() {
        assert!(matches!(parse_document("[1, 2]"), Err(StoreError::NotAnObject)));
    }

    #[test]
    fn import_rejects_incomplete_items() {
        let doc = r#"{"a": {"key": "k", "value": "", "tag": "t"}}"#;
        assert!(matches!(parse_import(doc), Err(StoreError::InvalidImport(_))));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id() {
        let store = MemoryStore::new();
        store.insert(token()).await.unwrap();
        let err = store
            .insert(Entry::new("token", "other", "prod"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(id) if id.as_str() == "prod-token"));
    }

    #[tokio::test]
    async fn update_moves_entry_to_new_id() {
        let store = MemoryStore::with_entries([token()]);
        let new_id = store
            .update(&EntryId::from("prod-token"), Entry::new("token", "abc123", "dev"))
            .await
            .unwrap();
        assert_eq!(new_id.as_str(), "dev-token");
        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all.contains_key(&new_id));
    }

    #[tokio::test]
    async fn update_same_id_overwrites_value() {
        let store = MemoryStore::with_entries([token()]);
        let id = EntryId::from("prod-token");
        store
            .update(&id, Entry::new("token", "rotated", "prod"))
            .await
            .unwrap();
        assert_eq!(store.fetch_all().await.unwrap()[&id].value, "rotated");
    }

    #[tokio::test]
    async fn update_into_taken_id_is_rejected() {
        let store = MemoryStore::with_entries([token(), Entry::new("token", "x", "dev")]);
        let err = store
            .update(&EntryId::from("dev-token"), Entry::new("token", "x", "prod"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.fetch_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn remove_counts_only_existing_ids() {
        let store = MemoryStore::with_entries([token()]);
        let removed = store
            .remove(&[EntryId::from("prod-token"), EntryId::from("nope")])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_reports_every_conflict() {
        let store = MemoryStore::with_entries([token(), Entry::new("db", "pw", "dev")]);
        let doc = r#"{
            "x": {"key": "token", "value": "new", "tag": "prod"},
            "y": {"key": "db", "value": "new", "tag": "dev"},
            "z": {"key": "fresh", "value": "new", "tag": "dev"}
        }"#;
        let conflicts = match store.import(doc).await.unwrap_err() {
            StoreError::ImportConflicts(conflicts) => conflicts,
            other => panic!("expected conflicts, got {other:?}"),
        };
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.contains(&"Duplicate entry found for key: token and tag: prod".to_string()));
        // Nothing is merged when any conflict exists.
        assert_eq!(store.fetch_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn import_rederives_ids() {
        let store = MemoryStore::new();
        let doc = r#"{"whatever": {"key": "token", "value": "abc123", "tag": "prod"}}"#;
        assert_eq!(store.import(doc).await.unwrap(), 1);
        assert!(store
            .fetch_all()
            .await
            .unwrap()
            .contains_key(&EntryId::from("prod-token")));
    }

    #[test]
    fn entry_written_over_unparsed_record_replaces_it() {
        let mut document =
            split_document(r#"{"prod-token": {"key": "token", "tag": "prod"}}"#).unwrap();
        assert!(document.entries.is_empty());
        assert_eq!(document.unparsed.len(), 1);

        apply_insert(&mut document.entries, token()).unwrap();
        let text = render_with_unparsed(&document.entries, &document.unparsed).unwrap();
        assert_eq!(parse_document(&text).unwrap()[&EntryId::from("prod-token")], token());
        assert!(split_document(&text).unwrap().unparsed.is_empty());
    }

    #[tokio::test]
    async fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("entries.json");
        let store = JsonFileStore::new(&path);

        assert!(store.fetch_all().await.unwrap().is_empty());
        store.insert(token()).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        let all = reopened.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn failed_write_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        let store = JsonFileStore::new(&path);
        store.insert(token()).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(store.insert(token()).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
