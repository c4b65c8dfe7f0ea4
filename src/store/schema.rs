//! Metadata schema: column name to dense offset mapping.

use std::collections::HashMap;

use crate::types::{CatalogError, CatalogResult, RESERVED_PREFIX};

/// Reject empty names and names using the reserved prefix.
pub fn validate_name(kind: &'static str, name: &str) -> CatalogResult<()> {
    if name.is_empty() || name.starts_with(RESERVED_PREFIX) {
        return Err(CatalogError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Ordered column names with their record offsets.
///
/// Offsets are always `0..len()` in column order; removing a column
/// renumbers everything after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
    offsets: HashMap<String, usize>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names in offset order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Offset of a column.
    pub fn offset(&self, name: &str) -> Option<usize> {
        self.offsets.get(name).copied()
    }

    /// Whether a column exists.
    pub fn contains(&self, name: &str) -> bool {
        self.offsets.contains_key(name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append a column and return its offset.
    pub fn add(&mut self, name: &str) -> CatalogResult<usize> {
        if self.contains(name) {
            return Err(CatalogError::DuplicateColumn(name.to_string()));
        }
        validate_name("column", name)?;
        let offset = self.names.len();
        self.names.push(name.to_string());
        self.offsets.insert(name.to_string(), offset);
        Ok(offset)
    }

    /// Remove a column, returning the offset it occupied.
    pub fn remove(&mut self, name: &str) -> Option<usize> {
        let offset = self.offsets.remove(name)?;
        self.names.remove(offset);
        self.offsets = self
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Some(offset)
    }

    /// (name, offset) pairs in offset order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.names.iter().enumerate().map(|(i, n)| (n.as_str(), i))
    }
}
