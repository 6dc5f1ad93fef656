//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&dyn DocumentStore` as the first argument. Multi-document
//! mutations (vote + counter, comment + counters, the deletion cascade)
//! are sequences of independent single-document store calls; the
//! consistency consequences are documented at each call site.

pub mod cascade;
pub mod category_repo;
pub mod comment_repo;
pub mod discussion_repo;
pub mod group_repo;
pub mod post_repo;
pub mod vote_ledger;

pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use discussion_repo::{ChannelRepo, DiscussionRepo, MessageRepo};
pub use group_repo::GroupRepo;
pub use post_repo::PostRepo;
pub use vote_ledger::{VoteLedger, COMMENT_VOTES, POST_VOTES};

use crate::store::{DocumentStore, Filter, Patch, StoreError};

/// Apply a counter patch to one target document.
///
/// This is always the second half of a two-step mutation: the ledger row
/// (vote or comment) has already been written by a separate store call,
/// and nothing spans the two -- a crash in between leaves the counter and
/// the ledger out of sync. A target that no longer exists is logged and
/// surfaced as an invariant failure, aborting the operation.
pub(crate) async fn adjust_counters(
    store: &dyn DocumentStore,
    collection: &str,
    entity: &'static str,
    id: &str,
    patch: Patch,
) -> Result<(), StoreError> {
    let matched = store
        .update_one(collection, Filter::new().id(id), patch)
        .await?;
    if !matched {
        tracing::warn!(entity, id, "counter update target missing");
        return Err(StoreError::Invariant(format!(
            "{entity} {id} missing for counter update"
        )));
    }
    Ok(())
}
