//! Store doubles for timing and failure paths.

use async_trait::async_trait;
use slashfill_core::error::Result;
use slashfill_core::{Entry, EntryId, EntryMap, EntryStore, MemoryStore, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Delegates to a [`MemoryStore`], but the first read takes `delay`.
/// Later reads return immediately, so an older query finishes last.
pub struct SlowFirstRead {
    inner: MemoryStore,
    delay: Duration,
    reads: AtomicUsize,
}

impl SlowFirstRead {
    pub fn new(entries: impl IntoIterator<Item = Entry>, delay: Duration) -> Self {
        Self {
            inner: MemoryStore::with_entries(entries),
            delay,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntryStore for SlowFirstRead {
    async fn fetch_all(&self) -> Result<EntryMap> {
        if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.fetch_all().await
    }

    async fn insert(&self, entry: Entry) -> Result<EntryId> {
        self.inner.insert(entry).await
    }

    async fn update(&self, original: &EntryId, entry: Entry) -> Result<EntryId> {
        self.inner.update(original, entry).await
    }

    async fn remove(&self, ids: &[EntryId]) -> Result<usize> {
        self.inner.remove(ids).await
    }

    async fn import(&self, document: &str) -> Result<usize> {
        self.inner.import(document).await
    }
}

/// Every operation fails.
pub struct BrokenStore;

#[async_trait]
impl EntryStore for BrokenStore {
    async fn fetch_all(&self) -> Result<EntryMap> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn insert(&self, _entry: Entry) -> Result<EntryId> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn update(&self, _original: &EntryId, _entry: Entry) -> Result<EntryId> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn remove(&self, _ids: &[EntryId]) -> Result<usize> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    async fn import(&self, _document: &str) -> Result<usize> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
}
