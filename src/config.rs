//! Catalog configuration and JSON catalog definitions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::SortOrder;
use crate::index::IndexKind;
use crate::types::{CatalogResult, Value, DEFAULT_BATCH_SIZE};

/// Catalog-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Sort index used when a query names none.
    pub default_sort_on: Option<String>,
    /// Sort direction used when a query names none.
    pub default_sort_order: SortOrder,
    /// Results per page.
    pub batch_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_sort_on: None,
            default_sort_order: SortOrder::Ascending,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// A metadata column to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(default)]
    pub default: Option<Value>,
}

/// An index to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub kind: IndexKind,
}

/// An object to catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    pub uid: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// A complete catalog description: structure, defaults, and contents.
///
/// ```json
/// {
///   "config": { "batch_size": 10 },
///   "columns": [ { "name": "title" } ],
///   "indexes": [ { "name": "text", "kind": "TextIndex" } ],
///   "objects": [ { "uid": "/a", "attributes": { "title": "A", "text": "alpha" } } ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDefinition {
    pub config: CatalogConfig,
    pub columns: Vec<ColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
    pub objects: Vec<ObjectDefinition>,
}

impl CatalogDefinition {
    /// Parse a definition from JSON text.
    pub fn from_json_str(s: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a definition from a JSON file.
    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
