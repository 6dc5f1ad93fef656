//! Repository for the `comments` collection.

use chrono::Utc;

use crate::collections::{COMMENTS, POSTS};
use crate::models::comment::{Comment, CreateComment};
use crate::repositories::adjust_counters;
use crate::store::{self, oid, DocumentStore, Filter, FindOptions, Order, Patch, StoreError};

use agora_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

fn page(limit: i64, offset: i64, order: Order) -> FindOptions {
    FindOptions::new()
        .sort("createdAt", order)
        .limit(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
        .skip(clamp_offset(offset))
}

/// Provides create and listing operations for comments.
///
/// Comments have no standalone update or delete; removal only happens
/// through the group deletion cascade.
pub struct CommentRepo;

impl CommentRepo {
    /// Create a comment and bump the derived counters it affects.
    ///
    /// Three independent store calls, in order: insert the comment, `$inc`
    /// the post's `commentsCount`, and -- for replies -- `$inc` the parent
    /// comment's `repliesCount`. Nothing spans them: a crash after the
    /// insert leaves counters behind the tree (accepted, not repaired
    /// automatically). A counter target that no longer exists aborts with
    /// an invariant failure; the inserted comment is not rolled back.
    pub async fn create(
        store: &dyn DocumentStore,
        input: CreateComment,
    ) -> Result<Comment, StoreError> {
        oid::validate(&input.post_id)?;
        if let Some(parent_id) = &input.parent_id {
            oid::validate(parent_id)?;
        }

        let mut comment = Comment {
            id: String::new(),
            post_id: input.post_id,
            parent_id: input.parent_id,
            author_id: input.author_id,
            content: input.content,
            upvotes_count: 0,
            downvotes_count: 0,
            replies_count: 0,
            created_at: Utc::now(),
        };
        let id = store::insert_entity(store, COMMENTS, &comment).await?;
        comment.id = id.to_hex();

        adjust_counters(
            store,
            POSTS,
            "post",
            &comment.post_id,
            Patch::new().inc("commentsCount", 1),
        )
        .await?;

        if let Some(parent_id) = &comment.parent_id {
            adjust_counters(
                store,
                COMMENTS,
                "comment",
                parent_id,
                Patch::new().inc("repliesCount", 1),
            )
            .await?;
        }

        Ok(comment)
    }

    /// Fetch a comment by ID, failing with `NotFound` when absent.
    pub async fn get(store: &dyn DocumentStore, id: &str) -> Result<Comment, StoreError> {
        oid::validate(id)?;
        store::fetch_one(store, COMMENTS, "comment", Filter::new().id(id))
            .await?
            .ok_or(StoreError::NotFound {
                entity: "comment",
                id: id.to_string(),
            })
    }

    /// List a post's comments at one tree level, newest first.
    ///
    /// `parent_id = None` lists only top-level comments (null or absent
    /// `parentId`); `Some(id)` lists only direct replies to that comment.
    pub async fn list(
        store: &dyn DocumentStore,
        post_id: &str,
        parent_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StoreError> {
        let filter = match parent_id {
            Some(parent_id) => Filter::new().eq("postId", post_id).eq("parentId", parent_id),
            None => Filter::new().eq("postId", post_id).is_null("parentId"),
        };
        store::fetch_many(
            store,
            COMMENTS,
            "comment",
            filter,
            page(limit, offset, Order::Desc),
        )
        .await
    }

    /// List the replies to a comment, oldest first.
    ///
    /// The ordering is deliberately opposite to [`CommentRepo::list`]:
    /// threads read chronologically.
    pub async fn list_replies(
        store: &dyn DocumentStore,
        parent_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StoreError> {
        let filter = Filter::new().eq("parentId", parent_id);
        store::fetch_many(
            store,
            COMMENTS,
            "comment",
            filter,
            page(limit, offset, Order::Asc),
        )
        .await
    }

    /// List a user's comments, newest first.
    pub async fn list_by_author(
        store: &dyn DocumentStore,
        author_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StoreError> {
        let filter = Filter::new().eq("authorId", author_id);
        store::fetch_many(
            store,
            COMMENTS,
            "comment",
            filter,
            page(limit, offset, Order::Desc),
        )
        .await
    }
}
