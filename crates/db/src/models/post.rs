//! Post entity model and DTOs.

use agora_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `posts` collection.
///
/// The three counters are derived state, owned by the vote ledger and the
/// comment repository; they are never set by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Id,
    pub group_id: Id,
    pub author_id: Id,
    pub title: String,
    pub content: String,
    pub upvotes_count: i64,
    pub downvotes_count: i64,
    pub comments_count: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}

/// DTO for creating a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub group_id: Id,
    pub author_id: Id,
    pub title: String,
    pub content: String,
}
