//! Repository for the `posts` collection.

use chrono::Utc;
use serde_json::json;

use crate::collections::{GROUPS, POSTS};
use crate::models::group::GroupType;
use crate::models::post::{CreatePost, Post};
use crate::store::{self, oid, DocumentStore, Filter, FindOptions, Order, StoreError};

use agora_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Newest-first scan options shared by the post listings.
fn page(limit: i64, offset: i64) -> FindOptions {
    FindOptions::new()
        .sort("createdAt", Order::Desc)
        .limit(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
        .skip(clamp_offset(offset))
}

/// Provides create and listing operations for posts.
///
/// Posts have no standalone update or delete; removal only happens
/// through the group deletion cascade.
pub struct PostRepo;

impl PostRepo {
    /// Create a post with zeroed counters.
    pub async fn create(store: &dyn DocumentStore, input: CreatePost) -> Result<Post, StoreError> {
        let mut post = Post {
            id: String::new(),
            group_id: input.group_id,
            author_id: input.author_id,
            title: input.title,
            content: input.content,
            upvotes_count: 0,
            downvotes_count: 0,
            comments_count: 0,
            created_at: Utc::now(),
        };
        let id = store::insert_entity(store, POSTS, &post).await?;
        post.id = id.to_hex();
        Ok(post)
    }

    /// Fetch a post by ID, failing with `NotFound` when absent.
    pub async fn get(store: &dyn DocumentStore, id: &str) -> Result<Post, StoreError> {
        oid::validate(id)?;
        store::fetch_one(store, POSTS, "post", Filter::new().id(id))
            .await?
            .ok_or(StoreError::NotFound {
                entity: "post",
                id: id.to_string(),
            })
    }

    /// List a group's posts, newest first.
    pub async fn list_by_group(
        store: &dyn DocumentStore,
        group_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, StoreError> {
        let filter = Filter::new().eq("groupId", group_id);
        store::fetch_many(store, POSTS, "post", filter, page(limit, offset)).await
    }

    /// List posts across all PUBLIC groups, newest first.
    ///
    /// Two phases: resolve the current PUBLIC group IDs, then scan posts
    /// with a set-membership filter. With zero public groups this returns
    /// empty without issuing the post query at all.
    pub async fn list_public(
        store: &dyn DocumentStore,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, StoreError> {
        let groups = store
            .find_many(
                GROUPS,
                Filter::new().eq("type", json!(GroupType::Public)),
                FindOptions::new(),
            )
            .await?;
        let group_ids: Vec<String> = groups
            .iter()
            .filter_map(|doc| doc.get("_id").and_then(|v| v.as_str()))
            .map(str::to_string)
            .collect();
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = Filter::new().within("groupId", group_ids);
        store::fetch_many(store, POSTS, "post", filter, page(limit, offset)).await
    }

    /// List a user's posts, newest first.
    pub async fn list_by_author(
        store: &dyn DocumentStore,
        author_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, StoreError> {
        let filter = Filter::new().eq("authorId", author_id);
        store::fetch_many(store, POSTS, "post", filter, page(limit, offset)).await
    }
}
