//! Filter, patch, and scan-option types interpreted by store backends.
//!
//! These are plain data. The engine builds them; a backend walks them.
//! Only the predicates the engine actually needs exist: exact match,
//! negated match, `$in`-style set membership, and null-or-absent -- no
//! joins, no range scans.

use serde_json::Value;

/// A single field predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    /// Exact match. Against an array field this has array-contains
    /// semantics (the document matches when any element equals the value).
    Eq(Value),
    /// Negation of [`Cond::Eq`], including the array-contains case.
    Ne(Value),
    /// Set membership: the field (or any element of an array field) equals
    /// one of the given values.
    In(Vec<Value>),
    /// The field is null or absent.
    IsNull,
}

/// Conjunction of field predicates; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Cond)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match on the store-assigned `_id` key.
    pub fn id(self, id: impl Into<Value>) -> Self {
        self.eq("_id", id)
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), Cond::Eq(value.into())));
        self
    }

    pub fn ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), Cond::Ne(value.into())));
        self
    }

    pub fn within<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push((field.into(), Cond::In(values)));
        self
    }

    pub fn is_null(mut self, field: impl Into<String>) -> Self {
        self.conditions.push((field.into(), Cond::IsNull));
        self
    }

    pub fn conditions(&self) -> &[(String, Cond)] {
        &self.conditions
    }
}

/// A single field mutation inside a [`Patch`].
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    /// Overwrite the field.
    Set(Value),
    /// Add to a numeric field, treating an absent field as zero.
    Inc(i64),
    /// Append to an array field unless the value is already present.
    AddToSet(Value),
    /// Remove every occurrence of the value from an array field.
    Pull(Value),
}

/// Compound single-document mutation.
///
/// All ops in one patch are applied atomically to the one matched
/// document; this is the strongest atomicity the store offers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<(String, PatchOp)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((field.into(), PatchOp::Set(value.into())));
        self
    }

    pub fn inc(mut self, field: impl Into<String>, delta: i64) -> Self {
        self.ops.push((field.into(), PatchOp::Inc(delta)));
        self
    }

    pub fn add_to_set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((field.into(), PatchOp::AddToSet(value.into())));
        self
    }

    pub fn pull(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((field.into(), PatchOp::Pull(value.into())));
        self
    }

    pub fn ops(&self) -> &[(String, PatchOp)] {
        &self.ops
    }
}

/// Sort direction for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Sort/limit/skip options for `find_many`.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Option<(String, Order)>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, field: impl Into<String>, order: Order) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }
}
