//! Generic per-user vote ledger.
//!
//! One state machine serves votes on posts and votes on comments; an
//! instance is parameterized by the ledger collection and by the target's
//! collection and foreign-key field. The ledger row and the counters on
//! the target live in different documents, so every transition is two
//! store calls -- row first, counters second -- with no transaction
//! spanning them. Concurrent voters on one target race safely on the
//! counters (`$inc` is atomic per document); a crash between the two
//! calls leaves ledger and counters out of sync, which is accepted and
//! not repaired automatically.

use chrono::Utc;
use serde_json::json;

use crate::collections;
use crate::models::vote::VoteType;
use crate::repositories::adjust_counters;
use crate::store::{oid, Document, DocumentStore, Filter, Patch, StoreError};

/// A vote ledger bound to one votable collection.
pub struct VoteLedger {
    /// Collection holding the (user, target) vote rows.
    pub vote_collection: &'static str,
    /// Collection holding the voted-on documents and their counters.
    pub target_collection: &'static str,
    /// Entity name for errors and logs.
    pub target_entity: &'static str,
    /// Foreign-key field on a vote row pointing at the target.
    pub target_field: &'static str,
}

/// Ledger for votes on posts.
pub const POST_VOTES: VoteLedger = VoteLedger {
    vote_collection: collections::VOTES,
    target_collection: collections::POSTS,
    target_entity: "post",
    target_field: "postId",
};

/// Ledger for votes on comments.
pub const COMMENT_VOTES: VoteLedger = VoteLedger {
    vote_collection: collections::COMMENT_VOTES,
    target_collection: collections::COMMENTS,
    target_entity: "comment",
    target_field: "commentId",
};

impl VoteLedger {
    /// Drive the user's vote on a target to `requested`.
    ///
    /// Transitions:
    /// - no row, `NONE` requested: nothing to do;
    /// - no row, `UP`/`DOWN`: insert the row, then `+1` the matching counter;
    /// - row present, same type requested: nothing to do (idempotent re-vote);
    /// - row present, `NONE` requested: delete the row, then `-1` the prior
    ///   counter;
    /// - row present, other type requested: update the row's `type` (its
    ///   `createdAt` keeps the original insert time), then apply `-1` prior /
    ///   `+1` new as one compound patch on the target.
    pub async fn set_vote(
        &self,
        store: &dyn DocumentStore,
        user_id: &str,
        target_id: &str,
        requested: VoteType,
    ) -> Result<(), StoreError> {
        oid::validate(target_id)?;

        let row_filter = Filter::new()
            .eq("userId", user_id)
            .eq(self.target_field, target_id);
        let existing = store.find_one(self.vote_collection, row_filter).await?;

        let Some(row) = existing else {
            let Some(counter) = requested.counter_field() else {
                return Ok(());
            };
            let mut doc = Document::new();
            doc.insert("userId".into(), user_id.into());
            doc.insert(self.target_field.into(), target_id.into());
            doc.insert("type".into(), json!(requested));
            doc.insert("createdAt".into(), json!(Utc::now().timestamp_millis()));
            store.insert_one(self.vote_collection, doc).await?;
            return self.adjust(store, target_id, Patch::new().inc(counter, 1)).await;
        };

        let current = row_type(&row)?;
        if current == requested {
            return Ok(());
        }
        let row_id = row_id(&row)?;

        match requested.counter_field() {
            None => {
                store
                    .delete_one(self.vote_collection, Filter::new().id(row_id))
                    .await?;
                let prior = self.prior_counter(current)?;
                self.adjust(store, target_id, Patch::new().inc(prior, -1)).await
            }
            Some(new_counter) => {
                store
                    .update_one(
                        self.vote_collection,
                        Filter::new().id(row_id),
                        Patch::new().set("type", json!(requested)),
                    )
                    .await?;
                let prior = self.prior_counter(current)?;
                self.adjust(
                    store,
                    target_id,
                    Patch::new().inc(prior, -1).inc(new_counter, 1),
                )
                .await
            }
        }
    }

    /// The user's current vote on a target; `NONE` when no row exists
    /// (never an error for absence).
    pub async fn get_vote(
        &self,
        store: &dyn DocumentStore,
        user_id: &str,
        target_id: &str,
    ) -> Result<VoteType, StoreError> {
        let filter = Filter::new()
            .eq("userId", user_id)
            .eq(self.target_field, target_id);
        match store.find_one(self.vote_collection, filter).await? {
            Some(row) => row_type(&row),
            None => Ok(VoteType::None),
        }
    }

    async fn adjust(
        &self,
        store: &dyn DocumentStore,
        target_id: &str,
        patch: Patch,
    ) -> Result<(), StoreError> {
        adjust_counters(
            store,
            self.target_collection,
            self.target_entity,
            target_id,
            patch,
        )
        .await
    }

    /// A stored row must carry `UP` or `DOWN`; anything else is a corrupt
    /// ledger.
    fn prior_counter(&self, current: VoteType) -> Result<&'static str, StoreError> {
        current.counter_field().ok_or_else(|| {
            StoreError::Invariant(format!(
                "{} vote row stored with type NONE",
                self.target_entity
            ))
        })
    }
}

fn row_type(row: &Document) -> Result<VoteType, StoreError> {
    let value = row.get("type").cloned().unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value)
        .map_err(|e| StoreError::Invariant(format!("vote row type decode failed: {e}")))
}

fn row_id(row: &Document) -> Result<&str, StoreError> {
    row.get("_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| StoreError::Invariant("vote row missing _id".into()))
}
