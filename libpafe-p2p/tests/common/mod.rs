// Shared helpers for the integration test crates. Each aggregator pulls this
// in with `#[path = "../common/mod.rs"]`, so not every item is used by every
// crate.
#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;
