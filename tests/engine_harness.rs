//! Suggest engine integration harness.
//!
//! # What this covers
//!
//! - **End-to-end slash command**: typing `hello /tok` over a one-entry store
//!   offers `[token]`, and selecting it sets the input to `abc123`.
//! - **Empty store**: any fragment yields no suggestions and the overlay is
//!   never shown.
//! - **Fragment boundaries**: multiple slashes, cursor in the middle of the
//!   value, whitespace inside the fragment.
//! - **Stale responses**: a slow read for an older fragment never overwrites
//!   the result of a newer one. Uses `start_paused` so timing is exact.
//! - **Focus lifecycle**: blur detaches, focusing another input moves the
//!   observation, teardown is permanent.
//! - **Selection no-ops**: the `/` vanished or the input is gone.
//! - **Store failure**: reads that fail produce no suggestions.
//!
//! # Running
//!
//! ```sh
//! cargo test --test engine_harness
//! ```

mod common;
use common::*;

use pretty_assertions::assert_eq;
use rstest::rstest;
use slashfill_core::{InsertionMode, JsonFileStore};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_scenario_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entries.json");
    std::fs::write(&path, TOKEN_STORE).unwrap();

    let mut engine = engine(Arc::new(JsonFileStore::new(&path)));
    engine.focus_in(1);
    engine.input_changed(1, "hello /tok", 10);
    assert_eq!(engine.trigger().unwrap().trigger.fragment, "tok");

    assert!(engine.settle().await);
    assert_eq!(shown_keys(&engine), vec!["token"]);

    let commit = engine.select(Some(("hello /tok", 10))).unwrap();
    assert_eq!(commit.input, 1);
    assert_eq!(commit.value, "abc123");
    assert_eq!(commit.suggestion.tag, "prod");
    assert!(!engine.overlay().is_visible());
}

#[tokio::test]
async fn empty_store_never_shows_overlay() {
    let mut engine = engine(StoreBuilder::new().memory());
    engine.focus_in(1);
    for (value, cursor) in [("/", 1), ("/a", 2), ("x /token", 8)] {
        engine.input_changed(1, value, cursor);
        engine.settle().await;
        assert!(!engine.overlay().is_visible(), "visible for {value:?}");
    }
}

#[tokio::test]
async fn empty_fragment_offers_every_entry() {
    let store = StoreBuilder::new()
        .entry("token", "abc123", "prod")
        .entry("db", "hunter2", "dev")
        .memory();
    let mut engine = engine(store);
    engine.focus_in(1);
    engine.input_changed(1, "/", 1);
    engine.settle().await;
    // Identifier order: dev-db before prod-token.
    assert_eq!(shown_keys(&engine), vec!["db", "token"]);
}

#[tokio::test]
async fn matching_ignores_case() {
    let store = StoreBuilder::new().entry("API_KEY", "sk-live", "prod").memory();
    let mut engine = engine(store);
    engine.focus_in(1);
    engine.input_changed(1, "/api", 4);
    engine.settle().await;
    assert_eq!(shown_keys(&engine), vec!["API_KEY"]);
}

#[rstest]
#[case::rightmost_slash("a/b/tok", 7, Some("tok"))]
#[case::cursor_mid_value("/token rest", 4, Some("tok"))]
#[case::no_slash("token", 5, None)]
#[case::slash_after_cursor("tok/", 3, None)]
#[case::no_whitespace_break("/tok en", 7, Some("tok en"))]
#[tokio::test]
async fn fragment_boundaries(
    #[case] value: &str,
    #[case] cursor: usize,
    #[case] fragment: Option<&str>,
) {
    let mut engine = engine(StoreBuilder::new().entry("token", "abc123", "prod").memory());
    engine.focus_in(1);
    engine.input_changed(1, value, cursor);
    assert_eq!(
        engine.trigger().map(|t| t.trigger.fragment.as_str()),
        fragment
    );
}

// ---------------------------------------------------------------------------
// Stale responses
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn slow_older_query_never_overwrites_newer() {
    let store = Arc::new(SlowFirstRead::new(
        [entry("token", "abc123", "prod"), entry("tea", "green", "home")],
        Duration::from_millis(500),
    ));
    let mut engine = engine(store.clone());
    engine.focus_in(1);

    // First query (matches both) is slow; second (token only) is fast.
    engine.input_changed(1, "/t", 2);
    engine.input_changed(1, "/to", 3);
    assert!(engine.settle().await);
    assert_eq!(shown_keys(&engine), vec!["token"]);

    // Let the slow read land; it must be discarded.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!engine.poll());
    assert_eq!(shown_keys(&engine), vec!["token"]);
    assert_eq!(store.reads(), 2);
}

#[tokio::test(start_paused = true)]
async fn response_after_trigger_closed_is_dropped() {
    let store = Arc::new(SlowFirstRead::new(
        [entry("token", "abc123", "prod")],
        Duration::from_millis(500),
    ));
    let mut engine = engine(store);
    engine.focus_in(1);
    engine.input_changed(1, "/t", 2);
    engine.input_changed(1, "t", 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!engine.poll());
    assert!(!engine.overlay().is_visible());
}

// ---------------------------------------------------------------------------
// Focus lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blur_detaches_input() {
    let mut engine = engine(StoreBuilder::new().entry("token", "abc123", "prod").memory());
    engine.focus_in(1);
    engine.input_changed(1, "/to", 3);
    engine.settle().await;
    assert!(engine.overlay().is_visible());

    let change = engine.focus_out(1);
    assert_eq!(change.detached, Some(1));
    assert!(!engine.overlay().is_visible());

    engine.input_changed(1, "/tok", 4);
    assert!(!engine.settle().await);
    assert!(!engine.overlay().is_visible());
}

#[tokio::test]
async fn focusing_another_input_moves_observation() {
    let mut engine = engine(StoreBuilder::new().entry("token", "abc123", "prod").memory());
    engine.focus_in(1);
    let change = engine.focus_in(2);
    assert_eq!(change.detached, Some(1));
    assert_eq!(change.attached, Some(2));

    engine.input_changed(1, "/t", 2);
    assert!(engine.trigger().is_none());
    engine.input_changed(2, "/t", 2);
    engine.settle().await;
    assert_eq!(engine.overlay().suggestions().len(), 1);
}

#[tokio::test]
async fn teardown_is_permanent() {
    let mut engine = engine(StoreBuilder::new().entry("token", "abc123", "prod").memory());
    engine.focus_in(1);
    engine.teardown();
    engine.focus_in(2);
    engine.input_changed(2, "/t", 2);
    assert!(!engine.settle().await);
    assert_eq!(engine.observed(), None);
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn selection_without_slash_is_noop() {
    let mut engine = engine(StoreBuilder::new().entry("token", "abc123", "prod").memory());
    engine.focus_in(1);
    engine.input_changed(1, "/tok", 4);
    engine.settle().await;

    // The host's value changed underneath without an input event.
    assert_eq!(engine.select(Some(("tok", 3))), None);
    assert!(!engine.overlay().is_visible());
}

#[tokio::test]
async fn selection_on_removed_input_is_noop() {
    let mut engine = engine(StoreBuilder::new().entry("token", "abc123", "prod").memory());
    engine.focus_in(1);
    engine.input_changed(1, "/tok", 4);
    engine.settle().await;
    assert_eq!(engine.select_index(0, None), None);
}

#[tokio::test]
async fn fragment_mode_replaces_only_the_command() {
    let store = StoreBuilder::new().entry("token", "abc123", "prod").memory();
    let mut engine = engine_with(store, InsertionMode::ReplaceFragment);
    engine.focus_in(1);
    engine.input_changed(1, "Bearer /tok", 11);
    engine.settle().await;
    let commit = engine.select(Some(("Bearer /tok", 11))).unwrap();
    assert_eq!(commit.value, "Bearer abc123");
    assert_eq!(commit.cursor, commit.value.len());
}

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_failure_yields_no_suggestions() {
    let mut engine = engine(Arc::new(BrokenStore));
    engine.focus_in(1);
    engine.input_changed(1, "/tok", 4);
    engine.settle().await;
    assert!(!engine.overlay().is_visible());
}
