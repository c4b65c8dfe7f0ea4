//! Exact-match index: one value per object, grouped by value.

use std::collections::BTreeSet;

use crate::engine::{Query, ResultSet};
use crate::types::{resolve_attribute, Catalogable, IndexResult, Rid, Value};

use super::postings::ValuePostings;
use super::{Clearable, Enumerable, Index, Indexable, Queryable, Sortable, Unindexable};

/// Maps each distinct attribute value to the rids holding it.
///
/// Supports every capability, including acting as a sort index.
#[derive(Debug, Clone)]
pub struct FieldIndex {
    id: String,
    postings: ValuePostings,
}

impl FieldIndex {
    /// Create an index over the attribute named `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            postings: ValuePostings::new(),
        }
    }

    /// Rids holding exactly `value`.
    pub fn get(&self, value: &Value) -> BTreeSet<Rid> {
        self.postings.rids_for(value).cloned().unwrap_or_default()
    }

    /// Number of indexed rids.
    pub fn len(&self) -> usize {
        self.postings.rid_count()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

impl Index for FieldIndex {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "FieldIndex"
    }

    fn as_indexable(&mut self) -> Option<&mut dyn Indexable> {
        Some(self)
    }

    fn as_unindexable(&mut self) -> Option<&mut dyn Unindexable> {
        Some(self)
    }

    fn as_queryable(&self) -> Option<&dyn Queryable> {
        Some(self)
    }

    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        Some(self)
    }

    fn as_clearable(&mut self) -> Option<&mut dyn Clearable> {
        Some(self)
    }

    fn as_sortable(&self) -> Option<&dyn Sortable> {
        Some(self)
    }
}

impl Indexable for FieldIndex {
    fn index_object(
        &mut self,
        rid: Rid,
        object: &dyn Catalogable,
        _threshold: Option<usize>,
    ) -> IndexResult<usize> {
        match resolve_attribute(object, &self.id) {
            Some(value) => Ok(self.postings.insert(rid, vec![value])),
            None => {
                self.postings.remove(rid);
                Ok(0)
            }
        }
    }
}

impl Unindexable for FieldIndex {
    fn unindex_object(&mut self, rid: Rid) -> IndexResult<()> {
        self.postings.remove(rid);
        Ok(())
    }
}

impl Queryable for FieldIndex {
    fn apply(&self, query: &Query) -> IndexResult<Option<(ResultSet, Vec<String>)>> {
        let Some(term) = query.term(&self.id) else {
            return Ok(None);
        };
        let rids = self.postings.matching(term)?;
        Ok(Some((ResultSet::Unranked(rids), vec![self.id.clone()])))
    }
}

impl Enumerable for FieldIndex {
    fn unique_values(&self) -> Vec<Value> {
        self.postings.keys().cloned().collect()
    }
}

impl Clearable for FieldIndex {
    fn clear(&mut self) {
        self.postings.clear();
    }
}

impl Sortable for FieldIndex {
    fn bucket_count(&self) -> usize {
        self.postings.key_count()
    }

    fn buckets(&self) -> Box<dyn Iterator<Item = (&Value, &BTreeSet<Rid>)> + '_> {
        Box::new(self.postings.entries())
    }

    fn sort_key(&self, rid: Rid) -> Option<&Value> {
        self.postings.values_for(rid).and_then(|values| values.first())
    }
}
