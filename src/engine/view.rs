//! Record views: read-only projections of metadata plus per-result scores.

use std::collections::HashMap;
use std::sync::Arc;

use crate::store::Schema;
use crate::types::{Rid, Score, Value};

use super::lazy::LazyCat;

/// Accessor name for the record id.
pub const RID_KEY: &str = "data_record_id_";
/// Accessor name for the raw score.
pub const SCORE_KEY: &str = "data_record_score_";
/// Accessor name for the normalized score.
pub const NORMALIZED_SCORE_KEY: &str = "data_record_normalized_score_";

/// Lazily materialized search results.
pub type SearchResults<'a> = LazyCat<'a, RecordView<'a>>;

/// Immutable snapshot of the view shape: column names and their offsets.
///
/// Rebuilt (with a new version) whenever columns or indexes change; views
/// keep the descriptor they were created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
    version: u64,
    columns: Vec<(String, usize)>,
    offsets: HashMap<String, usize>,
}

impl ViewDescriptor {
    /// Build a descriptor for `schema`.
    pub fn new(version: u64, schema: &Schema) -> Self {
        let columns: Vec<(String, usize)> = schema
            .columns()
            .map(|(name, offset)| (name.to_string(), offset))
            .collect();
        let offsets = columns.iter().cloned().collect();
        Self {
            version,
            columns,
            offsets,
        }
    }

    /// Version number; increases on every refresh.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// (name, offset) pairs in column order.
    pub fn columns(&self) -> &[(String, usize)] {
        &self.columns
    }

    /// Offset of a column.
    pub fn offset(&self, name: &str) -> Option<usize> {
        self.offsets.get(name).copied()
    }

    /// Whether the view exposes `name`, including the three result fields.
    pub fn has_key(&self, name: &str) -> bool {
        self.offsets.contains_key(name)
            || matches!(name, RID_KEY | SCORE_KEY | NORMALIZED_SCORE_KEY)
    }
}

/// A single search hit: rid with raw and normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub rid: Rid,
    pub score: Score,
    pub normalized: u32,
}

impl Hit {
    /// A hit without ranking information (both scores are 1).
    pub fn unranked(rid: Rid) -> Self {
        Self {
            rid,
            score: 1,
            normalized: 1,
        }
    }
}

/// Read-only projection of one metadata record.
///
/// Borrows the record from the metadata store; a rid with no stored record
/// yields a view whose columns are all absent.
#[derive(Debug, Clone)]
pub struct RecordView<'a> {
    descriptor: Arc<ViewDescriptor>,
    values: Option<&'a [Value]>,
    hit: Hit,
}

impl<'a> RecordView<'a> {
    pub fn new(descriptor: Arc<ViewDescriptor>, values: Option<&'a [Value]>, hit: Hit) -> Self {
        Self {
            descriptor,
            values,
            hit,
        }
    }

    /// Column value by name.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let offset = self.descriptor.offset(name)?;
        self.values?.get(offset)
    }

    /// Column value by name, including the result fields.
    pub fn value(&self, name: &str) -> Option<Value> {
        match name {
            RID_KEY => Some(int_value(self.hit.rid)),
            SCORE_KEY => Some(int_value(self.hit.score)),
            NORMALIZED_SCORE_KEY => Some(int_value(self.hit.normalized)),
            _ => self.get(name).cloned(),
        }
    }

    /// Whether the view has an accessor called `name`.
    pub fn has_key(&self, name: &str) -> bool {
        self.descriptor.has_key(name)
    }

    pub fn rid(&self) -> Rid {
        self.hit.rid
    }

    pub fn score(&self) -> Score {
        self.hit.score
    }

    /// Score scaled so the best hit of a ranked search is 100.
    pub fn normalized_score(&self) -> u32 {
        self.hit.normalized
    }

    /// The descriptor this view was created with.
    pub fn descriptor(&self) -> &Arc<ViewDescriptor> {
        &self.descriptor
    }

    /// JSON object with every column plus the result fields.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, _) in self.descriptor.columns() {
            let value = self.get(name).map(Value::to_json).unwrap_or_default();
            map.insert(name.clone(), value);
        }
        map.insert(RID_KEY.to_string(), self.hit.rid.into());
        map.insert(SCORE_KEY.to_string(), self.hit.score.into());
        map.insert(NORMALIZED_SCORE_KEY.to_string(), self.hit.normalized.into());
        serde_json::Value::Object(map)
    }
}

fn int_value(n: impl TryInto<i64>) -> Value {
    n.try_into().map_or(Value::Missing, Value::Int)
}
