//! Error types for the object catalog.

use thiserror::Error;

/// All errors that can abort a catalog operation.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A metadata column with this name already exists.
    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    /// An index with this name already exists.
    #[error("Index already exists: {0}")]
    DuplicateIndex(String),

    /// Column and index names may not be empty or start with the reserved prefix.
    #[error("Invalid {kind} name {name:?}: names beginning with \"_\" are reserved")]
    InvalidName { kind: &'static str, name: String },

    /// No index is registered under this name.
    #[error("Index not found: {0}")]
    UnknownIndex(String),

    /// The requested index kind is not one of the built-in kinds.
    #[error("Unknown index kind {0:?}: must be one of FieldIndex, TextIndex, KeywordIndex")]
    UnknownIndexKind(String),

    /// The index cannot enumerate its distinct values.
    #[error("Index {0} does not support enumerating unique values")]
    NotEnumerable(String),

    /// The index cannot be used as a sort index.
    #[error("Index {0} cannot be used for sorting")]
    NotSortable(String),

    /// An index failed while indexing an object.
    #[error("Index {index} failed: {source}")]
    Index {
        index: String,
        #[source]
        source: IndexError,
    },

    /// A query argument could not be understood.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures raised by an individual index implementation.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The index does not understand this kind of query term.
    #[error("Index {index} does not support {term} terms")]
    UnsupportedTerm { index: String, term: &'static str },

    /// A regex term did not compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A full-text query string could not be parsed.
    #[error("Malformed text query: {0}")]
    MalformedQuery(String),

    /// Any other failure (used by custom index implementations).
    #[error("{0}")]
    Other(String),
}

/// Failure of a method attribute on a cataloged object.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Attribute {name} failed: {reason}")]
pub struct AttributeError {
    pub name: String,
    pub reason: String,
}

impl AttributeError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convenience result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
