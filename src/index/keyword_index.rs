//! Multi-value index: an object contributes every element of a list attribute.

use crate::engine::{Query, ResultSet};
use crate::types::{resolve_attribute, Catalogable, IndexResult, Rid, Value};

use super::postings::ValuePostings;
use super::{Clearable, Enumerable, Index, Indexable, Queryable, Unindexable};

/// Maps each keyword to the rids whose attribute contains it.
#[derive(Debug, Clone)]
pub struct KeywordIndex {
    id: String,
    postings: ValuePostings,
}

impl KeywordIndex {
    /// Create an index over the attribute named `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            postings: ValuePostings::new(),
        }
    }

    /// Keywords indexed for a rid.
    pub fn keywords_for(&self, rid: Rid) -> &[Value] {
        self.postings.values_for(rid).unwrap_or(&[])
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

fn keywords(value: Value) -> Vec<Value> {
    match value {
        Value::List(items) => items.into_iter().filter(|v| !v.is_missing()).collect(),
        Value::Missing => Vec::new(),
        scalar => vec![scalar],
    }
}

impl Index for KeywordIndex {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "KeywordIndex"
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
}

impl Indexable for KeywordIndex {
    fn index_object(
        &mut self,
        rid: Rid,
        object: &dyn Catalogable,
        _threshold: Option<usize>,
    ) -> IndexResult<usize> {
        let values = resolve_attribute(object, &self.id)
            .map(keywords)
            .unwrap_or_default();
        Ok(self.postings.insert(rid, values))
    }
}

impl Unindexable for KeywordIndex {
    fn unindex_object(&mut self, rid: Rid) -> IndexResult<()> {
        self.postings.remove(rid);
        Ok(())
    }
}

impl Queryable for KeywordIndex {
    fn apply(&self, query: &Query) -> IndexResult<Option<(ResultSet, Vec<String>)>> {
        let Some(term) = query.term(&self.id) else {
            return Ok(None);
        };
        let rids = self.postings.matching(term)?;
        Ok(Some((ResultSet::Unranked(rids), vec![self.id.clone()])))
    }
}

impl Enumerable for KeywordIndex {
    fn unique_values(&self) -> Vec<Value> {
        self.postings.keys().cloned().collect()
    }
}

impl Clearable for KeywordIndex {
    fn clear(&mut self) {
        self.postings.clear();
    }
}
