//! Shared test utilities for slashfill integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Timing-sensitive helpers are deterministic under
//! `#[tokio::test(start_paused = true)]`.

#![allow(dead_code)]

pub mod builders;
pub mod fake_store;
pub mod fixtures;

pub use builders::*;
pub use fake_store::*;
pub use fixtures::*;
