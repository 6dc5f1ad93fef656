//! Shared leaf crate: type aliases, pagination bounds, slug helpers.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer and by any future CLI or worker tooling.

pub mod pagination;
pub mod slug;
pub mod types;
