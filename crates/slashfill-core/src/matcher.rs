//! Suggestion matching and entry filtering.
//!
//! [`match_suggestions`] is what the slash trigger uses: a case-insensitive
//! substring test against the entry key only, no ranking. Results follow the
//! store's enumeration order, which for [`EntryMap`](crate::store::EntryMap)
//! is identifier order.
//!
//! [`filter_entries`] is the broader search used by the entries pane and the
//! `list --search` command; it also looks at value and tag.

use crate::types::{Entry, EntryId, Suggestion};

/// Entries whose key contains `fragment`, ignoring case.
///
/// An empty fragment matches every entry.
pub fn match_suggestions<'a, I>(fragment: &str, entries: I) -> Vec<Suggestion>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let needle = fragment.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| entry.key.to_lowercase().contains(&needle))
        .map(Suggestion::from)
        .collect()
}

/// Entries whose key, value or tag contains `term`, ignoring case.
pub fn filter_entries<'a, I>(term: &str, entries: I) -> Vec<(&'a EntryId, &'a Entry)>
where
    I: IntoIterator<Item = (&'a EntryId, &'a Entry)>,
{
    let needle = term.to_lowercase();
    entries
        .into_iter()
        .filter(|(_, entry)| {
            entry.key.to_lowercase().contains(&needle)
                || entry.value.to_lowercase().contains(&needle)
                || entry.tag.to_lowercase().contains(&needle)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
