//! Cascade deletion of a group and everything it owns.
//!
//! The walk is an ordered plan with an explicit failure policy per step,
//! encoded as data in [`CASCADE_PLAN`] so the asymmetric guarantee is
//! auditable in one place: group and post deletion (and the comment/vote
//! cleanup for posts that were found) report failures; everything under
//! the discussion branch is advisory and never blocks group deletion.
//! There is no rollback -- the store is atomic per document only, and a
//! fault mid-plan leaves orphaned children behind.

use crate::collections::{CHANNELS, COMMENTS, DISCUSSIONS, GROUPS, MESSAGES, POSTS, VOTES};
use crate::models::discussion::{Channel, Discussion};
use crate::store::{self, oid, DocumentStore, Filter, FindOptions, StoreError};

/// What a step failure does to the rest of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Propagate the error and abort the remaining steps.
    Fatal,
    /// Log the error and continue; dependent steps see missing state and
    /// no-op.
    Advisory,
}

/// One stage of the deletion walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStage {
    /// Delete the group document itself.
    DeleteGroupRow,
    /// Collect the IDs of the group's posts for the dependent cleanups.
    EnumeratePosts,
    /// Delete all comments on the enumerated posts.
    DeleteComments,
    /// Delete all vote rows on the enumerated posts.
    DeleteVotes,
    /// Delete the group's posts.
    DeletePosts,
    /// Look up the group's discussion, if any.
    ResolveDiscussion,
    /// Delete the messages of every channel in the discussion.
    DeleteMessages,
    /// Delete the discussion's channels.
    DeleteChannels,
    /// Delete the discussion document.
    DeleteDiscussionRow,
}

/// A stage paired with its failure policy.
#[derive(Debug, Clone, Copy)]
pub struct CascadeStep {
    pub stage: CascadeStage,
    pub policy: FailurePolicy,
}

/// The ordered deletion plan, executed verbatim by [`delete_group`].
///
/// Comment/vote deletion is fatal only for posts that *were* enumerated;
/// when enumeration itself fails (advisory) those steps no-op and the
/// walk proceeds to the posts themselves.
pub const CASCADE_PLAN: &[CascadeStep] = &[
    CascadeStep {
        stage: CascadeStage::DeleteGroupRow,
        policy: FailurePolicy::Fatal,
    },
    CascadeStep {
        stage: CascadeStage::EnumeratePosts,
        policy: FailurePolicy::Advisory,
    },
    CascadeStep {
        stage: CascadeStage::DeleteComments,
        policy: FailurePolicy::Fatal,
    },
    CascadeStep {
        stage: CascadeStage::DeleteVotes,
        policy: FailurePolicy::Fatal,
    },
    CascadeStep {
        stage: CascadeStage::DeletePosts,
        policy: FailurePolicy::Fatal,
    },
    CascadeStep {
        stage: CascadeStage::ResolveDiscussion,
        policy: FailurePolicy::Advisory,
    },
    CascadeStep {
        stage: CascadeStage::DeleteMessages,
        policy: FailurePolicy::Advisory,
    },
    CascadeStep {
        stage: CascadeStage::DeleteChannels,
        policy: FailurePolicy::Advisory,
    },
    CascadeStep {
        stage: CascadeStage::DeleteDiscussionRow,
        policy: FailurePolicy::Advisory,
    },
];

/// State threaded through the plan.
#[derive(Default)]
struct CascadeState {
    /// `None` until enumeration runs, and left `None` when it fails --
    /// the dependent comment/vote steps then no-op.
    post_ids: Option<Vec<String>>,
    /// The group's discussion, when one exists and was resolved.
    discussion: Option<Discussion>,
}

/// Delete a group and all dependent entities, per [`CASCADE_PLAN`].
///
/// A malformed group ID fails fast before any step runs.
pub async fn delete_group(store: &dyn DocumentStore, group_id: &str) -> Result<(), StoreError> {
    oid::validate(group_id)?;

    let mut state = CascadeState::default();
    for step in CASCADE_PLAN {
        match run_stage(store, group_id, step.stage, &mut state).await {
            Ok(()) => {}
            Err(error) => match step.policy {
                FailurePolicy::Fatal => return Err(error),
                FailurePolicy::Advisory => {
                    tracing::warn!(
                        stage = ?step.stage,
                        group = group_id,
                        error = %error,
                        "cascade step failed, continuing"
                    );
                }
            },
        }
    }
    Ok(())
}

async fn run_stage(
    store: &dyn DocumentStore,
    group_id: &str,
    stage: CascadeStage,
    state: &mut CascadeState,
) -> Result<(), StoreError> {
    match stage {
        CascadeStage::DeleteGroupRow => {
            store.delete_one(GROUPS, Filter::new().id(group_id)).await?;
            Ok(())
        }
        CascadeStage::EnumeratePosts => {
            let docs = store
                .find_many(
                    POSTS,
                    Filter::new().eq("groupId", group_id),
                    FindOptions::new(),
                )
                .await?;
            state.post_ids = Some(
                docs.iter()
                    .filter_map(|doc| doc.get("_id").and_then(|v| v.as_str()))
                    .map(str::to_string)
                    .collect(),
            );
            Ok(())
        }
        CascadeStage::DeleteComments => {
            if let Some(post_ids) = state.post_ids.as_deref().filter(|ids| !ids.is_empty()) {
                store
                    .delete_many(COMMENTS, Filter::new().within("postId", post_ids.to_vec()))
                    .await?;
            }
            Ok(())
        }
        CascadeStage::DeleteVotes => {
            if let Some(post_ids) = state.post_ids.as_deref().filter(|ids| !ids.is_empty()) {
                store
                    .delete_many(VOTES, Filter::new().within("postId", post_ids.to_vec()))
                    .await?;
            }
            Ok(())
        }
        CascadeStage::DeletePosts => {
            store
                .delete_many(POSTS, Filter::new().eq("groupId", group_id))
                .await?;
            Ok(())
        }
        CascadeStage::ResolveDiscussion => {
            state.discussion = store::fetch_one(
                store,
                DISCUSSIONS,
                "discussion",
                Filter::new().eq("groupId", group_id),
            )
            .await?;
            Ok(())
        }
        CascadeStage::DeleteMessages => {
            let Some(discussion) = &state.discussion else {
                return Ok(());
            };
            let channels: Vec<Channel> = store::fetch_many(
                store,
                CHANNELS,
                "channel",
                Filter::new().eq("discussionId", discussion.id.as_str()),
                FindOptions::new(),
            )
            .await?;
            for channel in channels {
                // Per-channel faults are swallowed so one bad channel does
                // not strand the others.
                if let Err(error) = store
                    .delete_many(
                        MESSAGES,
                        Filter::new().eq("channelId", channel.id.as_str()),
                    )
                    .await
                {
                    tracing::warn!(
                        channel = %channel.id,
                        error = %error,
                        "message cleanup failed"
                    );
                }
            }
            Ok(())
        }
        CascadeStage::DeleteChannels => {
            let Some(discussion) = &state.discussion else {
                return Ok(());
            };
            store
                .delete_many(
                    CHANNELS,
                    Filter::new().eq("discussionId", discussion.id.as_str()),
                )
                .await?;
            Ok(())
        }
        CascadeStage::DeleteDiscussionRow => {
            let Some(discussion) = &state.discussion else {
                return Ok(());
            };
            store
                .delete_one(DISCUSSIONS, Filter::new().id(discussion.id.as_str()))
                .await?;
            Ok(())
        }
    }
}
