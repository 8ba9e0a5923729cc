use allocative::Allocative;
use bitvec::prelude::*;

use crate::value::Value;

/// A row: one value per schema column, in column order.
pub type Row = Vec<Value>;

/// Stable identity of a row.
///
/// Ids are handed out in increasing order and never reused, so they do not
/// move when other rows are deleted. Indexes store these ids rather than
/// physical offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Allocative)]
pub struct RowId(pub u64);

/// Insertion-ordered row storage addressed by [RowId].
///
/// Deleting a row only flips its bit in the deletion vector. Physical slots
/// are reclaimed once dead slots outnumber live ones; ids survive this
/// compaction.
#[derive(Debug, Default, Clone, Allocative)]
pub struct RowStore {
    /// Id of each physical slot. Always sorted, since ids are monotonic.
    ids: Vec<RowId>,
    rows: Vec<Row>,
    /// A `true` bit marks the slot at that position as deleted.
    #[allocative(skip)]
    deleted: BitVec,
    live: usize,
    next_id: u64,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row and returns its id.
    pub fn push(&mut self, row: Row) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;

        self.ids.push(id);
        self.rows.push(row);
        self.deleted.push(false);
        self.live += 1;
        id
    }

    /// Returns the row with the given id, or `None` if it was deleted or never existed.
    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.slot(id).map(|slot| &self.rows[slot])
    }

    /// Removes the row with the given id and returns it.
    pub fn remove(&mut self, id: RowId) -> Option<Row> {
        let slot = self.slot(id)?;
        self.deleted.set(slot, true);
        self.live -= 1;
        let row = std::mem::take(&mut self.rows[slot]);

        if self.dead_slots() > self.live {
            self.compact();
        }
        Some(row)
    }

    /// Iterates over live rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &Row)> {
        self.ids
            .iter()
            .zip(&self.rows)
            .enumerate()
            .filter(|(slot, _)| !self.deleted[*slot])
            .map(|(_, (id, row))| (*id, row))
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn slot(&self, id: RowId) -> Option<usize> {
        self.ids
            .binary_search(&id)
            .ok()
            .filter(|slot| !self.deleted[*slot])
    }

    fn dead_slots(&self) -> usize {
        self.ids.len() - self.live
    }

    fn compact(&mut self) {
        let mut ids = Vec::with_capacity(self.live);
        let mut rows = Vec::with_capacity(self.live);

        for (slot, (id, row)) in self.ids.drain(..).zip(self.rows.drain(..)).enumerate() {
            if !self.deleted[slot] {
                ids.push(id);
                rows.push(row);
            }
        }

        self.ids = ids;
        self.rows = rows;
        self.deleted = bitvec![0; self.live];
    }
}
