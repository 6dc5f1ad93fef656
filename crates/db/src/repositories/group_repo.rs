//! Repository for the `groups` collection.

use chrono::Utc;
use serde_json::json;

use crate::collections::GROUPS;
use crate::models::group::{CreateGroup, Group, GroupFilter, GroupType};
use crate::repositories::cascade;
use crate::store::{self, oid, DocumentStore, Filter, FindOptions, Patch, StoreError};

use agora_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Provides CRUD and membership operations for groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Create a group.
    ///
    /// Policy: the owner is enrolled as the first member at creation, so a
    /// fresh group always has `members_count == 1` and a later join by the
    /// owner is a no-op.
    pub async fn create(
        store: &dyn DocumentStore,
        input: CreateGroup,
    ) -> Result<Group, StoreError> {
        let mut group = Group {
            id: String::new(),
            name: input.name,
            description: input.description,
            slug: input.slug,
            group_type: input.group_type,
            owner_id: input.owner_id.clone(),
            member_ids: vec![input.owner_id],
            members_count: 1,
            created_at: Utc::now(),
        };
        let id = store::insert_entity(store, GROUPS, &group).await?;
        group.id = id.to_hex();
        Ok(group)
    }

    /// Fetch a group by slug. Absence is a normal outcome.
    pub async fn get_by_slug(
        store: &dyn DocumentStore,
        slug: &str,
    ) -> Result<Option<Group>, StoreError> {
        store::fetch_one(store, GROUPS, "group", Filter::new().eq("slug", slug)).await
    }

    /// Fetch a group by ID, failing with `NotFound` when absent.
    pub async fn get_by_id(store: &dyn DocumentStore, id: &str) -> Result<Group, StoreError> {
        oid::validate(id)?;
        store::fetch_one(store, GROUPS, "group", Filter::new().id(id))
            .await?
            .ok_or(StoreError::NotFound {
                entity: "group",
                id: id.to_string(),
            })
    }

    /// List groups matching the filter, in natural order.
    pub async fn list(
        store: &dyn DocumentStore,
        filter: GroupFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Group>, StoreError> {
        let mut query = Filter::new();
        if let Some(owner_id) = filter.owner_id {
            query = query.eq("ownerId", owner_id);
        }
        if let Some(group_type) = filter.group_type {
            query = query.eq("type", json!(group_type));
        }
        let options = FindOptions::new()
            .limit(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .skip(clamp_offset(offset));
        store::fetch_many(store, GROUPS, "group", query, options).await
    }

    /// Add a user to the member set.
    ///
    /// One conditional compound update: the filter excludes groups already
    /// containing the user, and the patch applies set-add and counter
    /// increment together, so a re-join can never double-count
    /// `members_count`. Returns `true` iff membership changed; `false`
    /// covers both "already a member" and "no such group".
    pub async fn join(
        store: &dyn DocumentStore,
        group_id: &str,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        oid::validate(group_id)?;
        store
            .update_one(
                GROUPS,
                Filter::new().id(group_id).ne("memberIds", user_id),
                Patch::new()
                    .add_to_set("memberIds", user_id)
                    .inc("membersCount", 1),
            )
            .await
    }

    /// Remove a user from the member set.
    ///
    /// Mirror of [`GroupRepo::join`]: the filter requires current
    /// membership, so leaving a group the user is not in changes nothing.
    pub async fn leave(
        store: &dyn DocumentStore,
        group_id: &str,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        oid::validate(group_id)?;
        store
            .update_one(
                GROUPS,
                Filter::new().id(group_id).eq("memberIds", user_id),
                Patch::new()
                    .pull("memberIds", user_id)
                    .inc("membersCount", -1),
            )
            .await
    }

    /// Membership predicate, answered by the store (no client-side scan
    /// of the member set).
    pub async fn is_member(
        store: &dyn DocumentStore,
        group_id: &str,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        oid::validate(group_id)?;
        let count = store
            .count_documents(GROUPS, Filter::new().id(group_id).eq("memberIds", user_id))
            .await?;
        Ok(count > 0)
    }

    /// List the PUBLIC groups containing the user. Private memberships are
    /// not exposed through this listing.
    pub async fn list_by_member(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> Result<Vec<Group>, StoreError> {
        let filter = Filter::new()
            .eq("memberIds", user_id)
            .eq("type", json!(GroupType::Public));
        store::fetch_many(store, GROUPS, "group", filter, FindOptions::new()).await
    }

    /// Delete a group and everything it owns. See [`cascade`] for the step
    /// order and per-step failure policy.
    pub async fn delete(store: &dyn DocumentStore, group_id: &str) -> Result<(), StoreError> {
        cascade::delete_group(store, group_id).await
    }
}
