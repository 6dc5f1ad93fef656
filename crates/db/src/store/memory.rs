//! In-memory store backend.
//!
//! Backs the integration tests and embedded/dev use. Collections live in
//! a lock-guarded map; every operation takes the lock for the duration of
//! the call, which makes each call atomic on its own -- exactly the
//! single-document guarantee the boundary promises, and nothing more.

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use super::query::{Cond, Filter, FindOptions, Order, Patch, PatchOp};
use super::{Document, DocumentStore, ObjectId, StoreError};

type Collections = HashMap<String, Vec<Document>>;

/// A [`DocumentStore`] held entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        document.insert("_id".into(), Value::from(id.to_hex()));
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError> {
        let guard = self.read()?;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches_filter(d, &filter)).cloned()))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let guard = self.read()?;
        let mut docs: Vec<Document> = guard
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| matches_filter(d, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(guard);

        if let Some((field, order)) = &options.sort {
            docs.sort_by(|a, b| {
                // `_id` tie-break keeps equal sort keys in insertion order
                // (keys increase per insert within a process).
                let ord = compare_values(a.get(field), b.get(field))
                    .then_with(|| compare_values(a.get("_id"), b.get("_id")));
                match order {
                    Order::Asc => ord,
                    Order::Desc => ord.reverse(),
                }
            });
        }

        let skip = options.skip.unwrap_or(0).max(0) as usize;
        let iter = docs.into_iter().skip(skip);
        Ok(match options.limit {
            Some(limit) if limit > 0 => iter.take(limit as usize).collect(),
            _ => iter.collect(),
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        patch: Patch,
    ) -> Result<bool, StoreError> {
        let mut guard = self.write()?;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter_mut().find(|d| matches_filter(d, &filter)) {
            Some(doc) => {
                apply_patch(doc, &patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        let mut guard = self.write()?;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| matches_filter(d, &filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        let mut guard = self.write()?;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !matches_filter(d, &filter));
        Ok((before - docs.len()) as u64)
    }

    async fn count_documents(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        let guard = self.read()?;
        Ok(guard
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches_filter(d, &filter)).count())
            .unwrap_or(0) as u64)
    }
}

fn matches_filter(doc: &Document, filter: &Filter) -> bool {
    filter
        .conditions()
        .iter()
        .all(|(field, cond)| cond_matches(doc.get(field), cond))
}

fn cond_matches(field_value: Option<&Value>, cond: &Cond) -> bool {
    match cond {
        Cond::Eq(expected) => eq_matches(field_value, expected),
        Cond::Ne(expected) => !eq_matches(field_value, expected),
        Cond::In(allowed) => match field_value {
            Some(Value::Array(items)) => items.iter().any(|item| allowed.contains(item)),
            Some(value) => allowed.contains(value),
            None => false,
        },
        Cond::IsNull => matches!(field_value, None | Some(Value::Null)),
    }
}

/// Equality with array-contains semantics on array fields.
fn eq_matches(field_value: Option<&Value>, expected: &Value) -> bool {
    match field_value {
        Some(Value::Array(items)) if !expected.is_array() => items.contains(expected),
        Some(value) => value == expected,
        None => expected.is_null(),
    }
}

fn apply_patch(doc: &mut Document, patch: &Patch) {
    for (field, op) in patch.ops() {
        match op {
            PatchOp::Set(value) => {
                doc.insert(field.clone(), value.clone());
            }
            PatchOp::Inc(delta) => {
                let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
                doc.insert(field.clone(), Value::from(current + delta));
            }
            PatchOp::AddToSet(value) => {
                let entry = doc
                    .entry(field.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(items) = entry {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
            }
            PatchOp::Pull(value) => {
                if let Some(Value::Array(items)) = doc.get_mut(field) {
                    items.retain(|item| item != value);
                }
            }
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    let (a, b) = (a.unwrap_or(&Value::Null), b.unwrap_or(&Value::Null));
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => CmpOrdering::Equal,
    }
}
