//! Repositories for the `discussions`, `channels`, and `messages`
//! collections -- the per-group real-time discussion space. The engine
//! persists and lists; delivery is someone else's job.

use chrono::Utc;

use crate::collections::{CHANNELS, DISCUSSIONS, MESSAGES};
use crate::models::discussion::{Channel, Discussion, Message};
use crate::store::{self, oid, DocumentStore, Filter, FindOptions, Order, StoreError};

use agora_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Provides operations for the one-per-group discussion document.
pub struct DiscussionRepo;

impl DiscussionRepo {
    /// Create the discussion document for a group.
    pub async fn create(
        store: &dyn DocumentStore,
        group_id: &str,
    ) -> Result<Discussion, StoreError> {
        let mut discussion = Discussion {
            id: String::new(),
            group_id: group_id.to_string(),
            created_at: Utc::now(),
        };
        let id = store::insert_entity(store, DISCUSSIONS, &discussion).await?;
        discussion.id = id.to_hex();
        Ok(discussion)
    }

    /// Fetch a discussion by ID. Absence is a normal outcome.
    pub async fn get(
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Option<Discussion>, StoreError> {
        oid::validate(id)?;
        store::fetch_one(store, DISCUSSIONS, "discussion", Filter::new().id(id)).await
    }

    /// Fetch a group's discussion. Absence is a normal outcome.
    pub async fn get_by_group(
        store: &dyn DocumentStore,
        group_id: &str,
    ) -> Result<Option<Discussion>, StoreError> {
        store::fetch_one(
            store,
            DISCUSSIONS,
            "discussion",
            Filter::new().eq("groupId", group_id),
        )
        .await
    }

    /// Fetch the group's discussion, creating it on first access.
    ///
    /// Find-then-create without locking: two concurrent first readers can
    /// both insert, leaving duplicate discussions for one group. A unique
    /// index on `groupId` plus a conditional upsert in the backing store
    /// closes that window if exactly-one must be guaranteed.
    pub async fn find_or_create(
        store: &dyn DocumentStore,
        group_id: &str,
    ) -> Result<Discussion, StoreError> {
        if let Some(discussion) = Self::get_by_group(store, group_id).await? {
            return Ok(discussion);
        }
        Self::create(store, group_id).await
    }
}

/// Provides operations for discussion channels.
pub struct ChannelRepo;

impl ChannelRepo {
    /// Create a channel in a discussion.
    pub async fn create(
        store: &dyn DocumentStore,
        discussion_id: &str,
        name: &str,
    ) -> Result<Channel, StoreError> {
        let mut channel = Channel {
            id: String::new(),
            discussion_id: discussion_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let id = store::insert_entity(store, CHANNELS, &channel).await?;
        channel.id = id.to_hex();
        Ok(channel)
    }

    /// Fetch a channel by ID, failing with `NotFound` when absent.
    pub async fn get(store: &dyn DocumentStore, id: &str) -> Result<Channel, StoreError> {
        oid::validate(id)?;
        store::fetch_one(store, CHANNELS, "channel", Filter::new().id(id))
            .await?
            .ok_or(StoreError::NotFound {
                entity: "channel",
                id: id.to_string(),
            })
    }

    /// List a discussion's channels, in natural order.
    pub async fn list_by_discussion(
        store: &dyn DocumentStore,
        discussion_id: &str,
    ) -> Result<Vec<Channel>, StoreError> {
        let filter = Filter::new().eq("discussionId", discussion_id);
        store::fetch_many(store, CHANNELS, "channel", filter, FindOptions::new()).await
    }
}

/// Provides operations for channel messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message to a channel.
    pub async fn create(
        store: &dyn DocumentStore,
        channel_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<Message, StoreError> {
        let mut message = Message {
            id: String::new(),
            channel_id: channel_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        let id = store::insert_entity(store, MESSAGES, &message).await?;
        message.id = id.to_hex();
        Ok(message)
    }

    /// List a channel's messages, oldest first -- history reads
    /// chronologically, unlike the post and comment listings.
    pub async fn list(
        store: &dyn DocumentStore,
        channel_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, StoreError> {
        let filter = Filter::new().eq("channelId", channel_id);
        let options = FindOptions::new()
            .sort("createdAt", Order::Asc)
            .limit(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .skip(clamp_offset(offset));
        store::fetch_many(store, MESSAGES, "message", filter, options).await
    }
}
