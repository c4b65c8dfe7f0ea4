//! Pluggable indexes. Each index is independent and incrementally updateable.
//!
//! An index advertises what it can do through capability probes on the
//! [`Index`] trait. The catalog calls a probe and skips (with a diagnostic)
//! any index that returns `None`, so implementations only provide the
//! capabilities they actually have.

pub mod field_index;
pub mod keyword_index;
pub mod lexicon;
pub mod postings;
pub mod registry;
pub mod text_index;
pub mod tokenizer;

use std::collections::BTreeSet;

use crate::engine::{Query, ResultSet};
use crate::types::{Catalogable, IndexResult, Rid, Value};

pub use field_index::FieldIndex;
pub use keyword_index::KeywordIndex;
pub use lexicon::{Lexicon, SharedLexicon};
pub use registry::{IndexKind, IndexRegistry};
pub use text_index::TextIndex;

/// Index (or reindex) an object's contribution under a rid.
pub trait Indexable {
    /// Returns a count of affected entries, used for bookkeeping only.
    fn index_object(
        &mut self,
        rid: Rid,
        object: &dyn Catalogable,
        threshold: Option<usize>,
    ) -> IndexResult<usize>;
}

/// Remove everything an index holds for a rid.
pub trait Unindexable {
    /// Must be safe to call for rids the index has never seen.
    fn unindex_object(&mut self, rid: Rid) -> IndexResult<()>;
}

/// Answer the part of a query that concerns this index.
pub trait Queryable {
    /// `Ok(None)` when the query has no term for this index; otherwise the
    /// matching rids and the names of the query arguments that were consumed.
    fn apply(&self, query: &Query) -> IndexResult<Option<(ResultSet, Vec<String>)>>;
}

/// List the distinct values held by an index.
pub trait Enumerable {
    fn unique_values(&self) -> Vec<Value>;
}

/// Drop all indexed state.
pub trait Clearable {
    fn clear(&mut self);
}

/// Group rids by sort key, for sorted search output.
pub trait Sortable {
    /// Number of distinct keys.
    fn bucket_count(&self) -> usize;

    /// Key and rid set for every key, in ascending key order.
    fn buckets(&self) -> Box<dyn Iterator<Item = (&Value, &BTreeSet<Rid>)> + '_>;

    /// The key a rid is stored under.
    fn sort_key(&self, rid: Rid) -> Option<&Value>;
}

/// A registered index. Capabilities are probed, not declared up front.
pub trait Index: Send + Sync {
    /// The index id (also the attribute and query argument it reads).
    fn id(&self) -> &str;

    /// Human-readable kind name.
    fn kind(&self) -> &str;

    fn as_indexable(&mut self) -> Option<&mut dyn Indexable> {
        None
    }

    fn as_unindexable(&mut self) -> Option<&mut dyn Unindexable> {
        None
    }

    fn as_queryable(&self) -> Option<&dyn Queryable> {
        None
    }

    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        None
    }

    fn as_clearable(&mut self) -> Option<&mut dyn Clearable> {
        None
    }

    fn as_sortable(&self) -> Option<&dyn Sortable> {
        None
    }
}
