//! Value postings: forward (value -> rids) and reverse (rid -> values) maps
//! shared by the exact-match and multi-value indexes.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use crate::engine::QueryTerm;
use crate::types::{IndexResult, Rid, Value};

/// Forward and reverse maps between indexed values and rids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuePostings {
    forward: BTreeMap<Value, BTreeSet<Rid>>,
    reverse: BTreeMap<Rid, Vec<Value>>,
}

impl ValuePostings {
    /// Create empty postings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything held for `rid` with `values`. Returns the number
    /// of values now indexed for it.
    pub fn insert(&mut self, rid: Rid, mut values: Vec<Value>) -> usize {
        values.sort();
        values.dedup();
        if self.reverse.get(&rid) == Some(&values) {
            return values.len();
        }
        self.remove(rid);
        if values.is_empty() {
            return 0;
        }
        for value in &values {
            self.forward.entry(value.clone()).or_default().insert(rid);
        }
        let count = values.len();
        self.reverse.insert(rid, values);
        count
    }

    /// Remove a rid. Returns whether anything was held for it.
    pub fn remove(&mut self, rid: Rid) -> bool {
        let Some(values) = self.reverse.remove(&rid) else {
            return false;
        };
        for value in values {
            if let Some(set) = self.forward.get_mut(&value) {
                set.remove(&rid);
                if set.is_empty() {
                    self.forward.remove(&value);
                }
            }
        }
        true
    }

    /// Rids matching a query term.
    pub fn matching(&self, term: &QueryTerm) -> IndexResult<BTreeSet<Rid>> {
        match term {
            QueryTerm::Equals(value) => Ok(self.forward.get(value).cloned().unwrap_or_default()),
            QueryTerm::Or(terms) => {
                let mut out = BTreeSet::new();
                for t in terms {
                    out.extend(self.matching(t)?);
                }
                Ok(out)
            }
            QueryTerm::Range { min, max } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Ok(BTreeSet::new());
                    }
                }
                let lo = min.as_ref().map_or(Bound::Unbounded, Bound::Included);
                let hi = max.as_ref().map_or(Bound::Unbounded, Bound::Included);
                let mut out = BTreeSet::new();
                for (_, rids) in self.forward.range((lo, hi)) {
                    out.extend(rids.iter().copied());
                }
                Ok(out)
            }
            QueryTerm::Regex(re) => {
                let mut out = BTreeSet::new();
                for (value, rids) in &self.forward {
                    if value.text().is_some_and(|t| re.is_match(&t)) {
                        out.extend(rids.iter().copied());
                    }
                }
                Ok(out)
            }
        }
    }

    /// Distinct values in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.forward.keys()
    }

    /// (value, rids) pairs in ascending value order.
    pub fn entries(&self) -> impl Iterator<Item = (&Value, &BTreeSet<Rid>)> + '_ {
        self.forward.iter()
    }

    /// Rids holding a value.
    pub fn rids_for(&self, value: &Value) -> Option<&BTreeSet<Rid>> {
        self.forward.get(value)
    }

    /// Values indexed for a rid.
    pub fn values_for(&self, rid: Rid) -> Option<&[Value]> {
        self.reverse.get(&rid).map(Vec::as_slice)
    }

    /// Number of distinct values.
    pub fn key_count(&self) -> usize {
        self.forward.len()
    }

    /// Number of indexed rids.
    pub fn rid_count(&self) -> usize {
        self.reverse.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}
