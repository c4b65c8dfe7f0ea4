//! Object catalog: a table of per-object metadata plus a set of pluggable
//! indexes that together answer multi-criteria queries.
//!
//! Objects are cataloged under a caller-supplied uid. Each index extracts
//! its own attribute from the object; searches ask every index for the
//! query arguments it understands, intersect the answers, and return lazy
//! record views that are ranked by relevance or ordered by a sort index.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod index;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use catalog::{Catalog, Search};
pub use config::{CatalogConfig, CatalogDefinition, ColumnDefinition, IndexDefinition};
pub use diagnostics::{Diagnostic, DiagnosticsSink, LogSink, MemorySink, Severity};
pub use engine::{
    Hit, LazyFilter, LazySequence, Query, QueryTerm, RecordView, ResultSet, SearchResults,
    SortOrder,
};
pub use index::{
    FieldIndex, Index, IndexKind, IndexRegistry, KeywordIndex, Lexicon, SharedLexicon, TextIndex,
};
pub use types::{
    AttributeError, Catalogable, CatalogError, CatalogResult, Document, IndexError, IndexResult,
    Rid, Score, Value, DEFAULT_BATCH_SIZE,
};
