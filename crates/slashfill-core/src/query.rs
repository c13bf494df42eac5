//! Sequence-numbered suggestion queries.
//!
//! Each keystroke that leaves a trigger open submits a query. The query runs
//! as a task on the host's tokio runtime: it reads the whole store and runs
//! the matcher. Responses come back over a channel tagged with the sequence
//! number of the request that produced them.
//!
//! Only the response for the most recently issued number is ever handed
//! out; anything older is stale and dropped. [`SuggestionQueries::invalidate`]
//! bumps the number without issuing a request, so responses still in flight
//! when the trigger closes can never reopen the overlay.

use crate::matcher::match_suggestions;
use crate::store::EntryStore;
use crate::types::Suggestion;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// The result of one suggestion query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub seq: u64,
    pub fragment: String,
    /// Empty both when nothing matched and when the store read failed.
    pub suggestions: Vec<Suggestion>,
}

pub struct SuggestionQueries {
    store: Arc<dyn EntryStore>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<QueryResponse>,
    rx: mpsc::UnboundedReceiver<QueryResponse>,
    /// Highest sequence number handed out, by `submit` or `invalidate`.
    issued: u64,
    /// True while the request numbered `issued` has not been answered yet.
    pending: bool,
}

impl SuggestionQueries {
    pub fn new(store: Arc<dyn EntryStore>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store,
            runtime,
            tx,
            rx,
            issued: 0,
            pending: false,
        }
    }

    /// Start a query for `fragment` and return its sequence number.
    pub fn submit(&mut self, fragment: impl Into<String>) -> u64 {
        self.issued += 1;
        self.pending = true;

        let seq = self.issued;
        let fragment = fragment.into();
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tracing::debug!(seq, fragment = %fragment, "suggestion query submitted");

        self.runtime.spawn(async move {
            let suggestions = match store.fetch_all().await {
                Ok(entries) => match_suggestions(&fragment, entries.values()),
                Err(err) => {
                    tracing::warn!(seq, error = %err, "store read failed; no suggestions");
                    Vec::new()
                }
            };
            // The receiver is gone only when the engine was dropped.
            let _ = tx.send(QueryResponse {
                seq,
                fragment,
                suggestions,
            });
        });

        seq
    }

    /// Mark every in-flight query as stale.
    pub fn invalidate(&mut self) {
        if self.pending {
            tracing::debug!(seq = self.issued, "suggestion query invalidated");
        }
        self.issued += 1;
        self.pending = false;
    }

    /// Sequence number of the latest submitted or invalidated request.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Non-blocking: drain arrived responses and return the current one, if
    /// it has arrived. Stale responses are discarded.
    pub fn try_latest(&mut self) -> Option<QueryResponse> {
        let mut latest = None;
        while let Ok(response) = self.rx.try_recv() {
            if let Some(current) = self.accept(response) {
                latest = Some(current);
            }
        }
        latest
    }

    /// Wait for the response to the current request. Returns `None` at once
    /// if no request is outstanding.
    pub async fn latest(&mut self) -> Option<QueryResponse> {
        while self.pending {
            let response = self.rx.recv().await?;
            if let Some(current) = self.accept(response) {
                return Some(current);
            }
        }
        None
    }

    fn accept(&mut self, response: QueryResponse) -> Option<QueryResponse> {
        if self.pending && response.seq == self.issued {
            self.pending = false;
            Some(response)
        } else {
            tracing::debug!(
                seq = response.seq,
                current = self.issued,
                "discarding stale suggestion response"
            );
            None
        }
    }
}

impl std::fmt::Debug for SuggestionQueries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionQueries")
            .field("issued", &self.issued)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
