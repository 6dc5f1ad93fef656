//! Comment entity model and DTOs.

use agora_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `comments` collection.
///
/// `parent_id` is null for top-level comments; when set it must reference
/// a comment on the same post. That containment is an application
/// invariant, not something the store enforces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Id,
    pub post_id: Id,
    pub parent_id: Option<Id>,
    pub author_id: Id,
    pub content: String,
    pub upvotes_count: i64,
    pub downvotes_count: i64,
    pub replies_count: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}

/// DTO for creating a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub post_id: Id,
    pub parent_id: Option<Id>,
    pub author_id: Id,
    pub content: String,
}
