//! Group entity model and DTOs.

use agora_core::slug::slugify;
use agora_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};

/// Group visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupType {
    Public,
    Private,
}

/// A document from the `groups` collection.
///
/// `members_count` tracks `member_ids` and must equal its length at every
/// quiescent point; both are mutated together in one compound update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
    pub description: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub owner_id: Id,
    pub member_ids: Vec<Id>,
    pub members_count: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: Timestamp,
}

/// DTO for creating a group.
#[derive(Debug, Clone)]
pub struct CreateGroup {
    pub name: String,
    pub description: String,
    pub group_type: GroupType,
    pub owner_id: Id,
    pub slug: String,
}

impl CreateGroup {
    /// Build a creation request with the slug derived from the name.
    ///
    /// Slug uniqueness is the caller's responsibility; use
    /// [`CreateGroup::with_slug`] to disambiguate a collision (e.g. by
    /// appending [`agora_core::slug::random_suffix`]).
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        group_type: GroupType,
        owner_id: impl Into<Id>,
    ) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            name,
            description: description.into(),
            group_type,
            owner_id: owner_id.into(),
            slug,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }
}

/// Optional predicates for group listing.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub owner_id: Option<Id>,
    pub group_type: Option<GroupType>,
}
