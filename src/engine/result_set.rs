//! Per-index result sets and the rules for combining them.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Rid, Score};

/// What an index returns for a query term: plain rids, or rids with scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSet {
    Unranked(BTreeSet<Rid>),
    Ranked(BTreeMap<Rid, Score>),
}

impl ResultSet {
    /// Number of rids.
    pub fn len(&self) -> usize {
        match self {
            Self::Unranked(set) => set.len(),
            Self::Ranked(map) => map.len(),
        }
    }

    /// Whether no rid matched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a rid is present.
    pub fn contains(&self, rid: Rid) -> bool {
        match self {
            Self::Unranked(set) => set.contains(&rid),
            Self::Ranked(map) => map.contains_key(&rid),
        }
    }

    /// The rids, discarding scores.
    pub fn rids(&self) -> BTreeSet<Rid> {
        match self {
            Self::Unranked(set) => set.clone(),
            Self::Ranked(map) => map.keys().copied().collect(),
        }
    }

    /// Whether this set carries scores.
    pub fn is_ranked(&self) -> bool {
        matches!(self, Self::Ranked(_))
    }

    /// Intersect `other` into this running result.
    ///
    /// - unranked ∩ unranked stays unranked;
    /// - an unranked running result degrades a ranked operand to its rids;
    /// - a ranked running result keeps its scores, restricted to the operand;
    /// - ranked ∩ ranked keeps common rids with summed scores.
    pub fn intersect(self, other: &ResultSet) -> ResultSet {
        match (self, other) {
            (Self::Unranked(a), Self::Unranked(b)) => {
                Self::Unranked(a.intersection(b).copied().collect())
            }
            (Self::Unranked(a), Self::Ranked(b)) => {
                Self::Unranked(a.into_iter().filter(|rid| b.contains_key(rid)).collect())
            }
            (Self::Ranked(a), Self::Unranked(b)) => {
                Self::Ranked(a.into_iter().filter(|(rid, _)| b.contains(rid)).collect())
            }
            (Self::Ranked(a), Self::Ranked(b)) => Self::Ranked(intersect_scored(a, b)),
        }
    }

    /// Restrict a plain rid set to this result (used when bucketing by sort key).
    pub fn restrict(&self, bucket: &BTreeSet<Rid>) -> BTreeSet<Rid> {
        bucket
            .iter()
            .copied()
            .filter(|rid| self.contains(*rid))
            .collect()
    }
}

/// Union of scored sets, summing scores of rids present in several.
pub fn union_scored(
    maps: impl IntoIterator<Item = BTreeMap<Rid, Score>>,
) -> BTreeMap<Rid, Score> {
    let mut out: BTreeMap<Rid, Score> = BTreeMap::new();
    for map in maps {
        for (rid, score) in map {
            let total = out.entry(rid).or_insert(0);
            *total = total.saturating_add(score);
        }
    }
    out
}

/// Scored intersection, summing scores.
pub fn intersect_scored(a: BTreeMap<Rid, Score>, b: &BTreeMap<Rid, Score>) -> BTreeMap<Rid, Score> {
    a.into_iter()
        .filter_map(|(rid, score)| b.get(&rid).map(|s| (rid, score.saturating_add(*s))))
        .collect()
}

/// Scored difference: rids of `a` not in `b`.
pub fn difference_scored(a: BTreeMap<Rid, Score>, b: &BTreeMap<Rid, Score>) -> BTreeMap<Rid, Score> {
    a.into_iter().filter(|(rid, _)| !b.contains_key(rid)).collect()
}
