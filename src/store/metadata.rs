//! Metadata store: rid to fixed-width record, ordered by rid.

use std::collections::BTreeMap;

use crate::types::{Record, Rid, Value};

/// Ordered map from record id to metadata record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataStore {
    records: BTreeMap<Rid, Record>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a record by rid.
    pub fn get(&self, rid: Rid) -> Option<&Record> {
        self.records.get(&rid)
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, rid: Rid, record: Record) {
        self.records.insert(rid, record);
    }

    /// Remove a record.
    pub fn remove(&mut self, rid: Rid) -> Option<Record> {
        self.records.remove(&rid)
    }

    /// Whether a record exists.
    pub fn contains(&self, rid: Rid) -> bool {
        self.records.contains_key(&rid)
    }

    /// Highest stored rid.
    pub fn last_rid(&self) -> Option<Rid> {
        self.records.keys().next_back().copied()
    }

    /// All rids in ascending order.
    pub fn rids(&self) -> impl Iterator<Item = Rid> + '_ {
        self.records.keys().copied()
    }

    /// All (rid, record) pairs in ascending rid order.
    pub fn iter(&self) -> impl Iterator<Item = (Rid, &Record)> + '_ {
        self.records.iter().map(|(rid, rec)| (*rid, rec))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// A copy of the table with `default` appended to every record.
    pub fn with_column_appended(&self, default: &Value) -> Self {
        let records = self
            .records
            .iter()
            .map(|(rid, rec)| {
                let mut rec = rec.clone();
                rec.push(default.clone());
                (*rid, rec)
            })
            .collect();
        Self { records }
    }

    /// A copy of the table with the value at `offset` removed from every record.
    pub fn with_column_removed(&self, offset: usize) -> Self {
        let records = self
            .records
            .iter()
            .map(|(rid, rec)| {
                let mut rec = rec.clone();
                if offset < rec.len() {
                    rec.remove(offset);
                }
                (*rid, rec)
            })
            .collect();
        Self { records }
    }
}
