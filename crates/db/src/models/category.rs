//! Category entity model.

use agora_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `categories` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
    pub slug: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}
