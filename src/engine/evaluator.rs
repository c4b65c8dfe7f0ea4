//! Query evaluation: ask every index, intersect, then rank or bucket.

use std::collections::BTreeSet;

use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::index::{IndexRegistry, Sortable};
use crate::store::MetadataStore;
use crate::types::{Rid, Score, Value};

use super::query::Query;
use super::result_set::ResultSet;
use super::view::Hit;

/// One unit of evaluator output.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    /// Hits in final order.
    Sequence(Vec<Hit>),
    /// Hits sharing one sort key.
    Bucket(Value, Vec<Hit>),
}

impl Emission {
    /// The hits carried by this emission.
    pub fn hits(&self) -> &[Hit] {
        match self {
            Self::Sequence(hits) | Self::Bucket(_, hits) => hits,
        }
    }
}

/// Result of evaluating a query.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Query argument names consumed by some index.
    pub used: BTreeSet<String>,
    /// Emitted sequences or buckets, buckets in ascending key order.
    pub emitted: Vec<Emission>,
    /// Index whose `apply` failed and stopped the search, if any.
    pub aborted_by: Option<String>,
}

/// Scale `score` against `max` to 0..=100, rounding down.
///
/// A zero maximum means every score equals it, so everything is 100.
pub fn normalize(score: Score, max: Score) -> u32 {
    if max == 0 {
        return 100;
    }
    ((score as u128 * 100) / max as u128).min(100) as u32
}

/// Order scored rids best first (ties: higher rid first) and normalize.
pub fn rank(scores: impl IntoIterator<Item = (Rid, Score)>) -> Vec<Hit> {
    let mut entries: Vec<(Score, Rid)> = scores.into_iter().map(|(r, s)| (s, r)).collect();
    entries.sort_unstable();
    entries.reverse();
    let max = entries.first().map(|(s, _)| *s).unwrap_or(0);
    entries
        .into_iter()
        .map(|(score, rid)| Hit {
            rid,
            score,
            normalized: normalize(score, max),
        })
        .collect()
}

/// Evaluates queries against a registry of indexes and a metadata store.
pub struct QueryEngine<'c> {
    indexes: &'c IndexRegistry,
    store: &'c MetadataStore,
    sink: &'c dyn DiagnosticsSink,
}

impl<'c> QueryEngine<'c> {
    pub fn new(
        indexes: &'c IndexRegistry,
        store: &'c MetadataStore,
        sink: &'c dyn DiagnosticsSink,
    ) -> Self {
        Self {
            indexes,
            store,
            sink,
        }
    }

    /// Evaluate `query`, optionally bucketing by `sort_index`.
    ///
    /// Indexes are consulted in registry order. If one fails, evaluation
    /// stops at once: nothing is emitted and `aborted_by` names the index,
    /// while `used` keeps the names consumed before the failure.
    pub fn evaluate(
        &self,
        query: &Query,
        sort_index: Option<&dyn Sortable>,
        used: Option<BTreeSet<String>>,
    ) -> Evaluation {
        let mut used = used.unwrap_or_default();
        let mut rs: Option<ResultSet> = None;

        for (name, index) in self.indexes.iter() {
            let Some(queryable) = index.as_queryable() else {
                continue;
            };
            match queryable.apply(query) {
                Ok(None) => {}
                Ok(Some((result, consumed))) => {
                    log::debug!("index {} matched {} rids", name, result.len());
                    used.extend(consumed);
                    rs = Some(match rs {
                        None => result,
                        Some(running) => running.intersect(&result),
                    });
                }
                Err(e) => {
                    self.sink.report(Diagnostic::error(
                        "search_results",
                        format!("index {} failed, search stopped: {}", name, e),
                    ));
                    return Evaluation {
                        used,
                        emitted: Vec::new(),
                        aborted_by: Some(name.to_string()),
                    };
                }
            }
        }

        let emitted = match (rs, sort_index) {
            (None, None) => vec![Emission::Sequence(
                self.store.rids().map(Hit::unranked).collect(),
            )],
            (None, Some(sort)) => sort
                .buckets()
                .map(|(key, rids)| {
                    Emission::Bucket(key.clone(), rids.iter().copied().map(Hit::unranked).collect())
                })
                .collect(),
            (Some(rs), _) if rs.is_empty() => Vec::new(),
            (Some(ResultSet::Ranked(scores)), None) => vec![Emission::Sequence(rank(scores))],
            (Some(ResultSet::Unranked(rids)), None) => {
                vec![Emission::Sequence(rids.into_iter().map(Hit::unranked).collect())]
            }
            (Some(rs), Some(sort)) => sorted_buckets(&rs, sort),
        };

        Evaluation {
            used,
            emitted,
            aborted_by: None,
        }
    }
}

/// Bucket a non-empty result by sort key, ascending. Scores are dropped.
///
/// When the result is larger than the number of keys, each key's rids are
/// intersected with it; otherwise each rid is looked up individually and
/// becomes a one-element bucket. Rids with no sort key are left out.
fn sorted_buckets(rs: &ResultSet, sort: &dyn Sortable) -> Vec<Emission> {
    if rs.len() > sort.bucket_count() {
        log::debug!("sorting {} rids by scanning {} keys", rs.len(), sort.bucket_count());
        sort.buckets()
            .filter_map(|(key, bucket)| {
                let rids = rs.restrict(bucket);
                if rids.is_empty() {
                    None
                } else {
                    Some(Emission::Bucket(
                        key.clone(),
                        rids.into_iter().map(Hit::unranked).collect(),
                    ))
                }
            })
            .collect()
    } else {
        log::debug!("sorting {} rids by key lookup", rs.len());
        let mut buckets: Vec<(Value, Hit)> = rs
            .rids()
            .into_iter()
            .filter_map(|rid| sort.sort_key(rid).map(|key| (key.clone(), Hit::unranked(rid))))
            .collect();
        buckets.sort_by(|a, b| a.0.cmp(&b.0));
        buckets
            .into_iter()
            .map(|(key, hit)| Emission::Bucket(key, vec![hit]))
            .collect()
    }
}
