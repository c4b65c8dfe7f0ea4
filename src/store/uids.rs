//! Identifier mapping: external uid to internal rid, both directions.

use std::collections::BTreeMap;

use crate::types::Rid;

/// Bidirectional uid/rid mapping over the currently cataloged objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMap {
    /// uid -> rid
    uids: BTreeMap<String, Rid>,
    /// rid -> uid
    paths: BTreeMap<Rid, String>,
}

impl IdentifierMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the rid for `uid`, allocating one if the uid is new.
    ///
    /// New rids are one more than the highest live rid, or 0 when empty.
    /// The flag is true when a rid was allocated.
    pub fn assign(&mut self, uid: &str) -> (Rid, bool) {
        if let Some(&rid) = self.uids.get(uid) {
            return (rid, false);
        }
        let rid = self
            .paths
            .keys()
            .next_back()
            .map(|last| last + 1)
            .unwrap_or(0);
        self.uids.insert(uid.to_string(), rid);
        self.paths.insert(rid, uid.to_string());
        (rid, true)
    }

    /// Forget `uid`, returning its rid. Unknown uids are a no-op.
    pub fn remove(&mut self, uid: &str) -> Option<Rid> {
        let rid = self.uids.remove(uid)?;
        self.paths.remove(&rid);
        Some(rid)
    }

    /// Rid of a uid.
    pub fn rid_for(&self, uid: &str) -> Option<Rid> {
        self.uids.get(uid).copied()
    }

    /// Uid of a rid.
    pub fn uid_for(&self, rid: Rid) -> Option<&str> {
        self.paths.get(&rid).map(String::as_str)
    }

    /// All (uid, rid) pairs, ordered by uid.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rid)> + '_ {
        self.uids.iter().map(|(uid, rid)| (uid.as_str(), *rid))
    }

    /// Number of mapped objects.
    pub fn len(&self) -> usize {
        self.uids.len()
    }

    /// Whether nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    /// Drop every mapping.
    pub fn clear(&mut self) {
        self.uids.clear();
        self.paths.clear();
    }
}
