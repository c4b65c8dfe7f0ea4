//! Index registry: named collection of pluggable indexes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::validate_name;
use crate::types::{CatalogError, CatalogResult};

use super::{FieldIndex, Index, KeywordIndex, SharedLexicon, TextIndex};

/// The built-in index implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndexKind {
    /// Exact-match on a single value.
    Field,
    /// Full-text over words.
    Text,
    /// Multi-valued keywords.
    Keyword,
}

impl IndexKind {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Field => "FieldIndex",
            Self::Text => "TextIndex",
            Self::Keyword => "KeywordIndex",
        }
    }

    /// Parse a kind name; accepts class-style and descriptive spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "fieldindex" | "field" | "exact-match" => Some(Self::Field),
            "textindex" | "text" | "full-text" => Some(Self::Text),
            "keywordindex" | "keyword" | "multi-value" => Some(Self::Keyword),
            _ => None,
        }
    }

    /// Construct an empty index of this kind. Text indexes use `lexicon`.
    pub fn build(&self, name: &str, lexicon: &SharedLexicon) -> Box<dyn Index> {
        match self {
            Self::Field => Box::new(FieldIndex::new(name)),
            Self::Text => Box::new(TextIndex::new(name, lexicon.clone())),
            Self::Keyword => Box::new(KeywordIndex::new(name)),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for IndexKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CatalogError::UnknownIndexKind(s.to_string()))
    }
}

impl TryFrom<String> for IndexKind {
    type Error = CatalogError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IndexKind> for String {
    fn from(kind: IndexKind) -> Self {
        kind.name().to_string()
    }
}

/// Indexes keyed by name. Iteration is in name order, so evaluation order
/// is stable for a given set of indexes.
#[derive(Default)]
pub struct IndexRegistry {
    indexes: BTreeMap<String, Box<dyn Index>>,
}

impl IndexRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an index under `name`.
    pub fn add(&mut self, name: &str, index: Box<dyn Index>) -> CatalogResult<()> {
        if self.indexes.contains_key(name) {
            return Err(CatalogError::DuplicateIndex(name.to_string()));
        }
        validate_name("index", name)?;
        self.indexes.insert(name.to_string(), index);
        Ok(())
    }

    /// Remove an index.
    pub fn remove(&mut self, name: &str) -> CatalogResult<Box<dyn Index>> {
        self.indexes
            .remove(name)
            .ok_or_else(|| CatalogError::UnknownIndex(name.to_string()))
    }

    /// Look up an index.
    pub fn get(&self, name: &str) -> Option<&dyn Index> {
        self.indexes.get(name).map(|b| b.as_ref())
    }

    /// Whether an index is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    /// (name, index) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Index)> + '_ {
        self.indexes.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Mutable (name, index) pairs in name order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Box<dyn Index>)> + '_ {
        self.indexes.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Registered names in order.
    pub fn names(&self) -> Vec<String> {
        self.indexes.keys().cloned().collect()
    }

    /// Number of indexes.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Whether no index is registered.
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

impl fmt::Debug for IndexRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.indexes.iter().map(|(k, v)| (k, v.kind())))
            .finish()
    }
}
