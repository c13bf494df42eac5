//! Core types for slashfill-core.
//!
//! This module defines the data shared across every layer: the stored
//! [`Entry`], its derived [`EntryId`], and the read-only [`Suggestion`]
//! projection handed to the presenter.

use serde::{Deserialize, Serialize};

/// Separator placed between tag and key when deriving an [`EntryId`].
pub const ID_SEPARATOR: char = '-';

/// A stored key/value/tag triple that can be suggested and inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Short name typed after `/` to find the entry.
    pub key: String,
    /// Text inserted into the input when the entry is selected.
    pub value: String,
    /// Free-form grouping label (`dev`, `staging`, `prod`, …).
    pub tag: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            tag: tag.into(),
        }
    }

    /// The identifier this entry is stored under.
    pub fn id(&self) -> EntryId {
        EntryId::derive(&self.key, &self.tag)
    }

    /// True when key, value and tag are all non-empty.
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty() && !self.tag.is_empty()
    }
}

/// Store identifier of an [`Entry`], always `tag-key`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn derive(key: &str, tag: &str) -> Self {
        Self(format!("{tag}{ID_SEPARATOR}{key}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for EntryId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only projection of an [`Entry`] produced fresh for every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub key: String,
    pub value: String,
    pub tag: String,
}

impl From<&Entry> for Suggestion {
    fn from(entry: &Entry) -> Self {
        Self {
            key: entry.key.clone(),
            value: entry.value.clone(),
            tag: entry.tag.clone(),
        }
    }
}

/// How a selected suggestion is written back into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionMode {
    /// Overwrite the whole input value with the entry's value.
    #[default]
    ReplaceValue,
    /// Replace only the `/fragment` span before the cursor.
    ReplaceFragment,
}

impl std::fmt::Display for InsertionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertionMode::ReplaceValue => write!(f, "replace_value"),
            InsertionMode::ReplaceFragment => write!(f, "replace_fragment"),
        }
    }
}
