//! Discussion, channel, and message entity models.

use agora_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `discussions` collection. One per group, created
/// lazily on first access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    #[serde(rename = "_id")]
    pub id: Id,
    pub group_id: Id,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}

/// A document from the `channels` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: Id,
    pub discussion_id: Id,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}

/// A document from the `messages` collection. `created_at` is the listing
/// order key; message history reads oldest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: Id,
    pub channel_id: Id,
    pub author_id: Id,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}
