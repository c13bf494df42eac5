//! Error type for the entry store.

use crate::types::EntryId;
use std::path::PathBuf;

/// Errors raised by [`EntryStore`](crate::store::EntryStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store document must be a JSON object of id -> entry")]
    NotAnObject,

    #[error("the key and tag combination must be unique ({0} already exists)")]
    Duplicate(EntryId),

    #[error("no entry with id {0}")]
    NotFound(EntryId),

    #[error("the imported data format is invalid: {0}")]
    InvalidImport(String),

    /// One message per imported item that collided with an existing entry.
    #[error("{}", .0.join("\n"))]
    ImportConflicts(Vec<String>),

    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
