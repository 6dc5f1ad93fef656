//! Integration tests for the discussion space:
//! - lazy find-or-create of the per-group discussion
//! - channel lookup semantics
//! - chronological message history

use std::time::Duration;

use assert_matches::assert_matches;

use agora_db::models::group::{CreateGroup, GroupType};
use agora_db::repositories::{ChannelRepo, DiscussionRepo, GroupRepo, MessageRepo};
use agora_db::store::MemoryStore;
use agora_db::StoreError;

async fn seed_group(store: &MemoryStore) -> String {
    GroupRepo::create(
        store,
        CreateGroup::new("Chatty", "talk here", GroupType::Public, "alice"),
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn discussion_is_created_lazily_and_reused() {
    let store = MemoryStore::new();
    let group_id = seed_group(&store).await;

    assert!(DiscussionRepo::get_by_group(&store, &group_id)
        .await
        .unwrap()
        .is_none());

    let first = DiscussionRepo::find_or_create(&store, &group_id).await.unwrap();
    let second = DiscussionRepo::find_or_create(&store, &group_id).await.unwrap();
    assert_eq!(first.id, second.id);

    let fetched = DiscussionRepo::get(&store, &first.id).await.unwrap();
    assert_eq!(fetched.unwrap().group_id, group_id);
}

#[tokio::test]
async fn absent_discussion_by_id_is_a_sentinel() {
    let store = MemoryStore::new();
    let absent = DiscussionRepo::get(&store, "0123456789abcdef01234567")
        .await
        .unwrap();
    assert!(absent.is_none());

    assert_matches!(
        DiscussionRepo::get(&store, "garbage").await.unwrap_err(),
        StoreError::InvalidId(_)
    );
}

#[tokio::test]
async fn channels_require_existence_on_lookup() {
    let store = MemoryStore::new();
    let group_id = seed_group(&store).await;
    let discussion = DiscussionRepo::find_or_create(&store, &group_id).await.unwrap();

    let general = ChannelRepo::create(&store, &discussion.id, "general").await.unwrap();
    ChannelRepo::create(&store, &discussion.id, "random").await.unwrap();

    let channels = ChannelRepo::list_by_discussion(&store, &discussion.id)
        .await
        .unwrap();
    let names: Vec<_> = channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["general", "random"]);

    assert_eq!(ChannelRepo::get(&store, &general.id).await.unwrap().id, general.id);
    assert_matches!(
        ChannelRepo::get(&store, "0123456789abcdef01234567")
            .await
            .unwrap_err(),
        StoreError::NotFound { entity: "channel", .. }
    );
}

#[tokio::test]
async fn message_history_reads_oldest_first() {
    let store = MemoryStore::new();
    let group_id = seed_group(&store).await;
    let discussion = DiscussionRepo::find_or_create(&store, &group_id).await.unwrap();
    let channel = ChannelRepo::create(&store, &discussion.id, "general").await.unwrap();

    for body in ["one", "two", "three"] {
        MessageRepo::create(&store, &channel.id, "bob", body).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let history = MessageRepo::list(&store, &channel.id, 0, 0).await.unwrap();
    let bodies: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(bodies, vec!["one", "two", "three"]);

    // pagination walks forward through history
    let tail = MessageRepo::list(&store, &channel.id, 2, 1).await.unwrap();
    let bodies: Vec<_> = tail.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(bodies, vec!["two", "three"]);
}
