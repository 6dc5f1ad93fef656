//! Community-discussion data engine.
//!
//! Owns groups and their membership ledger, posts and threaded comments
//! with derived counters, per-user vote ledgers, per-group discussions
//! (channels and ordered message history), and the cascade that removes
//! all of it when a group is deleted.
//!
//! The backing store is abstract: see [`store::DocumentStore`]. It provides
//! single-document atomicity and nothing more, so every multi-document
//! mutation in this crate is a sequence of independent store calls with the
//! consistency consequences documented at each site.

pub mod collections;
pub mod models;
pub mod repositories;
pub mod store;

pub use store::StoreError;
