//! The document-store boundary the engine is written against.
//!
//! The contract deliberately mirrors what a hosted document database
//! offers: CRUD on named collections, filtered/sorted/paginated scans,
//! and atomic updates scoped to a **single** document. There are no
//! cross-collection transactions, and the engine never assumes any.

pub mod memory;
pub mod oid;
pub mod query;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use memory::MemoryStore;
pub use oid::ObjectId;
pub use query::{Filter, FindOptions, Order, Patch};

/// A stored document: a JSON object keyed by field name.
///
/// Persisted documents always carry a `_id` field assigned by the store.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Failure taxonomy for store and repository operations.
///
/// Absence on read paths where absence is a normal outcome (no vote, no
/// discussion, no category) is represented as `Ok(None)` or a sentinel
/// value by the caller, never as an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed identifier. A client input error; the operation was not
    /// attempted and must not be retried as-is.
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    /// A required document was absent on a path that needs it to exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Transient backing-store fault. Eligible for caller-level retry;
    /// never retried internally.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The caller's deadline or cancellation fired during a store call.
    /// The mutation may or may not have been applied.
    #[error("store operation cancelled")]
    Cancelled,

    /// A cross-document invariant could not be maintained, e.g. a counter
    /// update aimed at a target that no longer exists, or an undecodable
    /// document. Logged at the site, and the operation is aborted.
    #[error("invariant violation: {0}")]
    Invariant(String),
}

/// Abstract document-store contract.
///
/// Filters use exact-match, `$in`-style set membership, null matching and
/// negated match only; equality against an array field has array-contains
/// semantics. A [`Patch`] may combine several field mutations and is
/// applied atomically to the single matched document.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning the store-assigned identifier.
    async fn insert_one(&self, collection: &str, document: Document)
        -> Result<ObjectId, StoreError>;

    /// Find the first document matching `filter`.
    async fn find_one(&self, collection: &str, filter: Filter)
        -> Result<Option<Document>, StoreError>;

    /// Find all documents matching `filter`, honoring sort/limit/skip.
    async fn find_many(
        &self,
        collection: &str,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Apply `patch` to the first document matching `filter`.
    ///
    /// Returns `true` iff a document matched. The whole patch is applied
    /// atomically to that one document.
    async fn update_one(&self, collection: &str, filter: Filter, patch: Patch)
        -> Result<bool, StoreError>;

    /// Delete the first document matching `filter`, returning the count (0 or 1).
    async fn delete_one(&self, collection: &str, filter: Filter) -> Result<u64, StoreError>;

    /// Delete every document matching `filter`, returning the count.
    async fn delete_many(&self, collection: &str, filter: Filter) -> Result<u64, StoreError>;

    /// Count documents matching `filter`.
    async fn count_documents(&self, collection: &str, filter: Filter) -> Result<u64, StoreError>;
}

/// Serialize a value into a [`Document`].
pub(crate) fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Invariant(format!(
            "expected an object document, got {other}"
        ))),
        Err(e) => Err(StoreError::Invariant(format!("encode failed: {e}"))),
    }
}

/// Decode a stored document into a typed model.
pub(crate) fn from_document<T: DeserializeOwned>(
    entity: &'static str,
    doc: Document,
) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::Object(doc))
        .map_err(|e| StoreError::Invariant(format!("decode of {entity} failed: {e}")))
}

/// Serialize an entity and insert it, stripping any placeholder `_id` so
/// the store always assigns the key.
pub(crate) async fn insert_entity<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    entity: &T,
) -> Result<ObjectId, StoreError> {
    let mut doc = to_document(entity)?;
    doc.remove("_id");
    store.insert_one(collection, doc).await
}

/// `find_one` + decode.
pub(crate) async fn fetch_one<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    entity: &'static str,
    filter: Filter,
) -> Result<Option<T>, StoreError> {
    match store.find_one(collection, filter).await? {
        Some(doc) => Ok(Some(from_document(entity, doc)?)),
        None => Ok(None),
    }
}

/// `find_many` + decode.
pub(crate) async fn fetch_many<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    entity: &'static str,
    filter: Filter,
    options: FindOptions,
) -> Result<Vec<T>, StoreError> {
    store
        .find_many(collection, filter, options)
        .await?
        .into_iter()
        .map(|doc| from_document(entity, doc))
        .collect()
}
