//! Suggest engine: the façade a host wires its inputs into.
//!
//! ```text
//! focus ──► InputObserver
//!              │ observed input only
//! change ──► trigger::detect ──► SuggestionQueries ──► store + matcher
//!                                        │ newest response only
//!                                        ▼
//!                                     Overlay ──► select ──► Commit
//! ```
//!
//! The engine is generic over the host's input identifier `I`. It never
//! touches the inputs itself: the host feeds it focus and change events and
//! applies the [`Commit`] returned by a selection.

use crate::observer::{FocusChange, InputObserver};
use crate::query::{QueryResponse, SuggestionQueries};
use crate::store::EntryStore;
use crate::trigger::{self, Trigger};
use crate::types::{InsertionMode, Suggestion};
use std::sync::Arc;
use tokio::runtime::Handle;

/// An open trigger bound to the input it was typed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerState<I> {
    pub input: I,
    pub trigger: Trigger,
}

/// Visibility state of the suggestion overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay<I> {
    Hidden,
    Visible {
        input: I,
        suggestions: Vec<Suggestion>,
        highlighted: usize,
    },
}

impl<I> Overlay<I> {
    pub fn is_visible(&self) -> bool {
        matches!(self, Overlay::Visible { .. })
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            Overlay::Visible { suggestions, .. } => suggestions,
            Overlay::Hidden => &[],
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self {
            Overlay::Visible { highlighted, .. } => Some(*highlighted),
            Overlay::Hidden => None,
        }
    }
}

/// The edit a host must apply after a suggestion is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit<I> {
    pub input: I,
    /// New full value of the input.
    pub value: String,
    /// Byte offset to place the cursor at.
    pub cursor: usize,
    pub suggestion: Suggestion,
}

#[derive(Debug)]
pub struct SuggestEngine<I> {
    observer: InputObserver<I>,
    queries: SuggestionQueries,
    trigger: Option<TriggerState<I>>,
    overlay: Overlay<I>,
    insertion: InsertionMode,
}

impl<I: Copy + Eq + std::fmt::Debug> SuggestEngine<I> {
    pub fn new(store: Arc<dyn EntryStore>, runtime: Handle, insertion: InsertionMode) -> Self {
        Self {
            observer: InputObserver::new(),
            queries: SuggestionQueries::new(store, runtime),
            trigger: None,
            overlay: Overlay::Hidden,
            insertion,
        }
    }

    // -- focus -------------------------------------------------------------

    pub fn focus_in(&mut self, input: I) -> FocusChange<I> {
        let change = self.observer.focus_in(input);
        if change.detached.is_some() {
            self.close();
        }
        change
    }

    pub fn focus_out(&mut self, input: I) -> FocusChange<I> {
        let change = self.observer.focus_out(input);
        if change.detached.is_some() {
            self.close();
        }
        change
    }

    /// Detach from everything and ignore all later events.
    pub fn teardown(&mut self) {
        self.observer.teardown();
        self.close();
    }

    // -- input -------------------------------------------------------------

    /// The value or cursor of `input` changed. Ignored unless `input` is
    /// the observed input.
    pub fn input_changed(&mut self, input: I, value: &str, cursor: usize) {
        if !self.observer.observes(input) {
            return;
        }
        match trigger::detect(value, cursor) {
            Some(trigger) => {
                self.queries.submit(trigger.fragment.clone());
                self.trigger = Some(TriggerState { input, trigger });
            }
            None => {
                if self.trigger.is_some() {
                    tracing::debug!(input = ?input, "trigger closed");
                }
                self.close();
            }
        }
    }

    /// Apply the newest query response, if one has arrived. Returns true
    /// when the overlay changed.
    pub fn poll(&mut self) -> bool {
        match self.queries.try_latest() {
            Some(response) => self.apply(response),
            None => false,
        }
    }

    /// Wait for the outstanding query, if any, and apply it.
    pub async fn settle(&mut self) -> bool {
        match self.queries.latest().await {
            Some(response) => self.apply(response),
            None => false,
        }
    }

    fn apply(&mut self, response: QueryResponse) -> bool {
        let Some(state) = &self.trigger else {
            return false;
        };
        let before = self.overlay.is_visible();
        self.overlay = if response.suggestions.is_empty() {
            Overlay::Hidden
        } else {
            Overlay::Visible {
                input: state.input,
                suggestions: response.suggestions,
                highlighted: 0,
            }
        };
        tracing::debug!(
            seq = response.seq,
            fragment = %response.fragment,
            shown = self.overlay.suggestions().len(),
            "suggestions applied"
        );
        before || self.overlay.is_visible()
    }

    // -- overlay -----------------------------------------------------------

    pub fn highlight_next(&mut self) {
        if let Overlay::Visible {
            suggestions,
            highlighted,
            ..
        } = &mut self.overlay
        {
            *highlighted = (*highlighted + 1) % suggestions.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if let Overlay::Visible {
            suggestions,
            highlighted,
            ..
        } = &mut self.overlay
        {
            *highlighted = highlighted.checked_sub(1).unwrap_or(suggestions.len() - 1);
        }
    }

    /// Hide the overlay and close the trigger without touching the input.
    pub fn dismiss(&mut self) {
        self.close();
    }

    /// Select the highlighted suggestion. See [`SuggestEngine::select_index`].
    pub fn select(&mut self, current: Option<(&str, usize)>) -> Option<Commit<I>> {
        let index = self.overlay.highlighted()?;
        self.select_index(index, current)
    }

    /// Select suggestion `index`.
    ///
    /// `current` is the live value and cursor of the overlay's input, or
    /// `None` if that input no longer exists. A missing input or a `/` that
    /// is no longer before the cursor turns the selection into a no-op. The
    /// overlay is hidden either way.
    pub fn select_index(&mut self, index: usize, current: Option<(&str, usize)>) -> Option<Commit<I>> {
        let Overlay::Visible {
            input, suggestions, ..
        } = &self.overlay
        else {
            return None;
        };
        let input = *input;
        let suggestion = suggestions.get(index)?.clone();
        self.close();

        if !self.observer.observes(input) {
            tracing::debug!(input = ?input, "selection for an unobserved input ignored");
            return None;
        }
        let Some((value, cursor)) = current else {
            tracing::debug!(input = ?input, "selection for a detached input ignored");
            return None;
        };
        let open = trigger::detect(value, cursor)?;

        let (value, cursor) = match self.insertion {
            InsertionMode::ReplaceValue => {
                let len = suggestion.value.len();
                (suggestion.value.clone(), len)
            }
            InsertionMode::ReplaceFragment => {
                let mut out = String::with_capacity(value.len() + suggestion.value.len());
                out.push_str(&value[..open.slash]);
                out.push_str(&suggestion.value);
                let cursor = out.len();
                out.push_str(&value[open.cursor..]);
                (out, cursor)
            }
        };
        tracing::debug!(input = ?input, key = %suggestion.key, mode = %self.insertion, "suggestion committed");

        Some(Commit {
            input,
            value,
            cursor,
            suggestion,
        })
    }

    fn close(&mut self) {
        self.trigger = None;
        self.overlay = Overlay::Hidden;
        self.queries.invalidate();
    }

    // -- accessors ---------------------------------------------------------

    pub fn overlay(&self) -> &Overlay<I> {
        &self.overlay
    }

    pub fn trigger(&self) -> Option<&TriggerState<I>> {
        self.trigger.as_ref()
    }

    pub fn observed(&self) -> Option<I> {
        self.observer.observed()
    }

    pub fn insertion(&self) -> InsertionMode {
        self.insertion
    }

    pub fn set_insertion(&mut self, insertion: InsertionMode) {
        self.insertion = insertion;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::Entry;
    use pretty_assertions::assert_eq;

    fn engine(entries: Vec<Entry>, insertion: InsertionMode) -> SuggestEngine<u8> {
        SuggestEngine::new(
            Arc::new(MemoryStore::with_entries(entries)),
            Handle::current(),
            insertion,
        )
    }

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new("token", "abc123", "prod"),
            Entry::new("tty", "/dev/tty", "dev"),
        ]
    }

    #[tokio::test]
    async fn typing_a_fragment_shows_matches() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.focus_in(1);
        e.input_changed(1, "hello /tok", 10);
        assert!(e.settle().await);
        assert_eq!(e.overlay().suggestions().len(), 1);
        assert_eq!(e.overlay().highlighted(), Some(0));
    }

    #[tokio::test]
    async fn unobserved_input_is_ignored() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.input_changed(1, "/t", 2);
        assert!(e.trigger().is_none());
        assert!(!e.settle().await);
        assert!(!e.overlay().is_visible());
    }

    #[tokio::test]
    async fn losing_the_slash_hides_overlay() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.focus_in(1);
        e.input_changed(1, "/t", 2);
        e.settle().await;
        assert!(e.overlay().is_visible());

        e.input_changed(1, "t", 1);
        assert!(!e.overlay().is_visible());
        assert!(e.trigger().is_none());
    }

    #[tokio::test]
    async fn no_matches_keeps_overlay_hidden() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.focus_in(1);
        e.input_changed(1, "/zzz", 4);
        assert!(!e.settle().await);
        assert!(!e.overlay().is_visible());
        // The trigger itself stays open; only the overlay is hidden.
        assert!(e.trigger().is_some());
    }

    #[tokio::test]
    async fn highlight_wraps_both_ways() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.focus_in(1);
        e.input_changed(1, "/t", 2);
        e.settle().await;
        e.highlight_prev();
        assert_eq!(e.overlay().highlighted(), Some(1));
        e.highlight_next();
        assert_eq!(e.overlay().highlighted(), Some(0));
    }

    #[tokio::test]
    async fn replace_value_overwrites_whole_input() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.focus_in(1);
        e.input_changed(1, "hello /tok", 10);
        e.settle().await;
        let commit = e.select(Some(("hello /tok", 10))).unwrap();
        assert_eq!(commit.value, "abc123");
        assert_eq!(commit.cursor, 6);
        assert!(!e.overlay().is_visible());
    }

    #[tokio::test]
    async fn replace_fragment_keeps_surrounding_text() {
        let mut e = engine(sample(), InsertionMode::ReplaceFragment);
        e.focus_in(1);
        e.input_changed(1, "key=/tok;rest", 8);
        e.settle().await;
        let commit = e.select(Some(("key=/tok;rest", 8))).unwrap();
        assert_eq!(commit.value, "key=abc123;rest");
        assert_eq!(commit.cursor, "key=abc123".len());
    }

    #[tokio::test]
    async fn selection_on_removed_input_is_noop() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.focus_in(1);
        e.input_changed(1, "/tok", 4);
        e.settle().await;
        assert_eq!(e.select(None), None);
        assert!(!e.overlay().is_visible());
    }

    #[tokio::test]
    async fn blur_closes_overlay_and_later_edits_do_nothing() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.focus_in(1);
        e.input_changed(1, "/t", 2);
        e.settle().await;

        e.focus_out(1);
        e.focus_in(2);
        assert!(!e.overlay().is_visible());

        e.input_changed(1, "/to", 3);
        assert!(!e.settle().await);
        assert!(!e.overlay().is_visible());
    }

    #[tokio::test]
    async fn teardown_ignores_everything_after() {
        let mut e = engine(sample(), InsertionMode::ReplaceValue);
        e.focus_in(1);
        e.teardown();
        e.focus_in(1);
        e.input_changed(1, "/t", 2);
        assert!(!e.settle().await);
        assert_eq!(e.observed(), None);
    }
}
