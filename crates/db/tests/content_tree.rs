//! Integration tests for posts and the comment tree:
//! - comment creation and the derived post/parent counters
//! - top-level vs. reply listing filters and their opposed orderings
//! - public post listing, including the no-query short-circuit
//! - counter invariant handling for dangling targets

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use assert_matches::assert_matches;

use agora_db::models::comment::CreateComment;
use agora_db::models::group::{CreateGroup, GroupType};
use agora_db::models::post::CreatePost;
use agora_db::repositories::{CommentRepo, GroupRepo, PostRepo};
use agora_db::store::{Document, DocumentStore, Filter, FindOptions, MemoryStore, ObjectId, Patch};
use agora_db::StoreError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_group(store: &dyn DocumentStore, name: &str, group_type: GroupType) -> String {
    GroupRepo::create(store, CreateGroup::new(name, "seeded", group_type, "alice"))
        .await
        .unwrap()
        .id
}

async fn seed_post(store: &dyn DocumentStore, group_id: &str, title: &str) -> String {
    PostRepo::create(
        store,
        CreatePost {
            group_id: group_id.to_string(),
            author_id: "alice".into(),
            title: title.into(),
            content: "body".into(),
        },
    )
    .await
    .unwrap()
    .id
}

fn comment(post_id: &str, parent_id: Option<&str>, author: &str, content: &str) -> CreateComment {
    CreateComment {
        post_id: post_id.to_string(),
        parent_id: parent_id.map(str::to_string),
        author_id: author.to_string(),
        content: content.to_string(),
    }
}

/// Spread `created_at` stamps so ordering assertions are unambiguous.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn comment_creation_bumps_post_and_parent_counters() {
    let store = MemoryStore::new();
    let group_id = seed_group(&store, "G", GroupType::Public).await;
    let post_id = seed_post(&store, &group_id, "P").await;

    let top = CommentRepo::create(&store, comment(&post_id, None, "bob", "top"))
        .await
        .unwrap();
    assert_eq!(PostRepo::get(&store, &post_id).await.unwrap().comments_count, 1);

    let reply = CommentRepo::create(&store, comment(&post_id, Some(&top.id), "alice", "re"))
        .await
        .unwrap();
    assert_eq!(reply.parent_id.as_deref(), Some(top.id.as_str()));

    // replies count toward the post total too
    assert_eq!(PostRepo::get(&store, &post_id).await.unwrap().comments_count, 2);
    assert_eq!(CommentRepo::get(&store, &top.id).await.unwrap().replies_count, 1);
}

#[tokio::test]
async fn dangling_counter_targets_abort_with_invariant_failure() {
    let store = MemoryStore::new();
    let ghost_post = "0123456789abcdef01234567";

    let err = CommentRepo::create(&store, comment(ghost_post, None, "bob", "x"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Invariant(_));

    assert_matches!(
        CommentRepo::create(&store, comment("bad id", None, "bob", "x"))
            .await
            .unwrap_err(),
        StoreError::InvalidId(_)
    );
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn top_level_and_reply_listings_filter_and_order_differently() {
    let store = MemoryStore::new();
    let group_id = seed_group(&store, "G", GroupType::Public).await;
    let post_id = seed_post(&store, &group_id, "P").await;

    let first = CommentRepo::create(&store, comment(&post_id, None, "bob", "first"))
        .await
        .unwrap();
    tick().await;
    let second = CommentRepo::create(&store, comment(&post_id, None, "carol", "second"))
        .await
        .unwrap();
    tick().await;
    let reply_a = CommentRepo::create(&store, comment(&post_id, Some(&first.id), "dave", "ra"))
        .await
        .unwrap();
    tick().await;
    let reply_b = CommentRepo::create(&store, comment(&post_id, Some(&first.id), "erin", "rb"))
        .await
        .unwrap();

    // top level: newest first, replies never appear
    let top = CommentRepo::list(&store, &post_id, None, 0, 0).await.unwrap();
    let top_ids: Vec<_> = top.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(top_ids, vec![second.id.as_str(), first.id.as_str()]);
    assert!(top.iter().all(|c| c.parent_id.is_none()));

    // replies: oldest first, chronological thread order
    let replies = CommentRepo::list_replies(&store, &first.id, 0, 0).await.unwrap();
    let reply_ids: Vec<_> = replies.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(reply_ids, vec![reply_a.id.as_str(), reply_b.id.as_str()]);
    assert!(replies
        .iter()
        .all(|c| c.parent_id.as_deref() == Some(first.id.as_str())));

    // the same level through the parent-scoped listing, newest first
    let scoped = CommentRepo::list(&store, &post_id, Some(&first.id), 0, 0)
        .await
        .unwrap();
    let scoped_ids: Vec<_> = scoped.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(scoped_ids, vec![reply_b.id.as_str(), reply_a.id.as_str()]);
}

#[tokio::test]
async fn post_listings_are_newest_first_and_paginated() {
    let store = MemoryStore::new();
    let group_id = seed_group(&store, "G", GroupType::Public).await;

    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        ids.push(seed_post(&store, &group_id, title).await);
        tick().await;
    }

    let all = PostRepo::list_by_group(&store, &group_id, 0, 0).await.unwrap();
    let listed: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str(), ids[0].as_str()]);

    let middle = PostRepo::list_by_group(&store, &group_id, 1, 1).await.unwrap();
    assert_eq!(middle.len(), 1);
    assert_eq!(middle[0].id, ids[1]);

    let by_author = PostRepo::list_by_author(&store, "alice", 0, 0).await.unwrap();
    assert_eq!(by_author.len(), 3);
}

#[tokio::test]
async fn public_listing_spans_public_groups_only() {
    let store = MemoryStore::new();
    let public_id = seed_group(&store, "Open", GroupType::Public).await;
    let private_id = seed_group(&store, "Closed", GroupType::Private).await;

    let visible = seed_post(&store, &public_id, "visible").await;
    seed_post(&store, &private_id, "hidden").await;

    let posts = PostRepo::list_public(&store, 0, 0).await.unwrap();
    let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![visible.as_str()]);
}

// ---------------------------------------------------------------------------
// The no-query short-circuit, proved with a call-counting store
// ---------------------------------------------------------------------------

/// Delegating store that counts `find_many` calls per collection.
struct CountingStore {
    inner: MemoryStore,
    find_many_calls: Mutex<HashMap<String, usize>>,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            find_many_calls: Mutex::new(HashMap::new()),
        }
    }

    fn find_many_count(&self, collection: &str) -> usize {
        self.find_many_calls
            .lock()
            .unwrap()
            .get(collection)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl DocumentStore for CountingStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError> {
        self.inner.insert_one(collection, document).await
    }

    async fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<Document>, StoreError> {
        self.inner.find_one(collection, filter).await
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        *self
            .find_many_calls
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_insert(0) += 1;
        self.inner.find_many(collection, filter, options).await
    }

    async fn update_one(&self, collection: &str, filter: Filter, patch: Patch) -> Result<bool, StoreError> {
        self.inner.update_one(collection, filter, patch).await
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        self.inner.delete_one(collection, filter).await
    }

    async fn delete_many(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        self.inner.delete_many(collection, filter).await
    }

    async fn count_documents(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        self.inner.count_documents(collection, filter).await
    }
}

#[tokio::test]
async fn public_listing_with_no_public_groups_issues_no_post_query() {
    let store = CountingStore::new();
    seed_group(&store, "Closed", GroupType::Private).await;

    let posts = PostRepo::list_public(&store, 0, 0).await.unwrap();
    assert!(posts.is_empty());
    assert_eq!(store.find_many_count("groups"), 1);
    assert_eq!(store.find_many_count("posts"), 0);
}
