use std::collections::BTreeMap;
use std::ops::RangeBounds;

use allocative::Allocative;

use crate::row_store::RowId;
use crate::value::Value;

/// Ordered lookup structure from a column value to the rows holding it.
///
/// Keys are kept sorted by [Value]'s ordering so the index can also serve
/// range scans. Several rows may share a key; each bucket lists its row ids
/// in insertion order.
#[derive(Debug, Default, Clone, Allocative)]
pub struct Index {
    entries: BTreeMap<Value, Vec<RowId>>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to the bucket for `key`, creating the bucket if needed.
    pub fn insert(&mut self, key: Value, id: RowId) {
        self.entries.entry(key).or_default().push(id);
    }

    /// Drops `id` from the bucket for `key`. Empty buckets are removed.
    /// Does nothing if the key or the id is not present.
    pub fn remove(&mut self, key: &Value, id: RowId) {
        if let Some(ids) = self.entries.get_mut(key) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                self.entries.remove(key);
            }
        }
    }

    /// Returns the row ids stored under `key`, or an empty slice.
    pub fn find(&self, key: &Value) -> &[RowId] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over the buckets whose key falls in `range`, in key order.
    ///
    /// ```
    /// # use tabula::{Index, RowId, Value};
    /// let mut index = Index::new();
    /// index.insert(Value::Integer(1), RowId(0));
    /// index.insert(Value::Integer(5), RowId(1));
    /// index.insert(Value::Integer(9), RowId(2));
    ///
    /// let keys: Vec<_> = index
    ///     .range(Value::Integer(2)..Value::Integer(10))
    ///     .map(|(key, _)| key.clone())
    ///     .collect();
    /// assert_eq!(keys, vec![Value::Integer(5), Value::Integer(9)]);
    /// ```
    pub fn range<R>(&self, range: R) -> impl Iterator<Item = (&Value, &[RowId])>
    where
        R: RangeBounds<Value>,
    {
        self.entries
            .range(range)
            .map(|(key, ids)| (key, ids.as_slice()))
    }

    /// Iterates over every bucket in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &[RowId])> {
        self.entries.iter().map(|(key, ids)| (key, ids.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
